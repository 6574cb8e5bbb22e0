//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! # エラーレスポンス
//!
//! `GatewayError`は`error_code()`・`external_message()`・`status_code()`を提供し、
//! Aqman互換の構造化エラーボディ（[`ErrorResponse`]）を生成できます。

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Required field is missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Serial is not present in the registry
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Request body could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Serial in the path differs from the serial in the body
    #[error("Serial mismatch: path={path}, body={body}")]
    SerialMismatch {
        /// Serial taken from the request path
        path: String,
        /// Serial taken from the request body
        body: String,
    },

    /// No route matches the request path
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// Request rejected by the HTTP layer before reaching a handler
    /// (wrong method, undecodable path parameter, oversized body)
    #[error("Request rejected ({status}): {details}")]
    Rejected {
        /// Status chosen by the HTTP layer
        status: StatusCode,
        /// Rejection text from the HTTP layer
        details: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the structured error code sent to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Common(CommonError::MissingField(_)) => "MissingRequiredField",
            Self::Common(CommonError::Serialization(_)) => "MalformedRequest",
            Self::Common(CommonError::Config(_)) => "InternalError",
            Self::DeviceNotFound(_) => "NoDeviceFound",
            Self::MalformedRequest(_) => "MalformedRequest",
            Self::SerialMismatch { .. } => "SerialMismatch",
            Self::RouteNotFound(_) => "NotFound",
            Self::Rejected { status, .. } => match *status {
                StatusCode::METHOD_NOT_ALLOWED => "MethodNotAllowed",
                StatusCode::PAYLOAD_TOO_LARGE => "PayloadTooLarge",
                s if s.is_server_error() => "InternalError",
                _ => "MalformedRequest",
            },
            Self::Database(_) => "InternalError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Returns a short, safe message for external clients.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(CommonError::Config(_)) | Self::Database(_) | Self::Internal(_) => {
                "Internal server error"
            }
            Self::Rejected { status, .. } if status.is_server_error() => "Internal server error",
            _ => "The request is malformed.",
        }
    }

    /// Returns the client-facing details string.
    ///
    /// ストレージや内部エラーの詳細はログにのみ出力し、クライアントには返さない。
    pub fn details(&self) -> String {
        match self {
            Self::DeviceNotFound(_) => {
                "The requested Aqman is Not Yet Installed. Not Present in DB".to_string()
            }
            Self::Common(CommonError::MissingField(field)) => {
                format!("Field '{}' is required and must not be empty", field)
            }
            Self::Common(CommonError::Serialization(e)) => e.to_string(),
            Self::MalformedRequest(reason) => reason.clone(),
            Self::RouteNotFound(path) => format!("No route for path {}", path),
            Self::Rejected { status, .. } if status.is_server_error() => String::new(),
            Self::Rejected { details, .. } => details.clone(),
            Self::SerialMismatch { path, body } => format!(
                "Serial in request path ({}) does not match serial in request body ({})",
                path, body
            ),
            Self::Common(CommonError::Config(_)) | Self::Database(_) | Self::Internal(_) => {
                String::new()
            }
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(CommonError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Common(_) => StatusCode::BAD_REQUEST,
            Self::DeviceNotFound(_) => StatusCode::BAD_REQUEST,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::SerialMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts this error to the structured error body.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.external_message().to_string(),
                details: self.details(),
            },
        }
    }
}

/// 構造化エラーレスポンス
///
/// # Example
///
/// ```json
/// {
///   "error": {
///     "code": "NoDeviceFound",
///     "message": "The request is malformed.",
///     "details": "The requested Aqman is Not Yet Installed. Not Present in DB"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// The error details
    pub error: ErrorDetail,
}

/// エラー詳細
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NoDeviceFound")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    pub details: String,
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (Gateway)
pub type GatewayResult<T> = Result<T, GatewayError>;
