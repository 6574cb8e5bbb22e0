//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use aqman_gateway_common::error::GatewayError;
use axum::{
    body::to_bytes,
    http::{header, Uri},
    response::{IntoResponse, Response},
    Json,
};

/// リジェクション本文の読み取り上限
const REJECTION_BODY_LIMIT: usize = 4 * 1024;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub GatewayError);

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        // 詳細はログにのみ出力する
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::warn!(error = %self.0, code = self.0.error_code(), "Rejected request");
        }

        (status, Json(self.0.to_error_response())).into_response()
    }
}

/// どのルートにも一致しないリクエスト
pub async fn unknown_route(uri: Uri) -> AppError {
    AppError(GatewayError::RouteNotFound(uri.path().to_string()))
}

/// axum標準のリジェクション（405、パス抽出失敗など）を構造化エラーボディに置き換える
///
/// JSONの応答と成功応答はそのまま通す。`Allow` ヘッダーは引き継ぐ。
pub async fn structured_rejections(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let details = to_bytes(body, REJECTION_BODY_LIMIT)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let mut rendered = AppError(GatewayError::Rejected { status, details }).into_response();
    if let Some(allow) = parts.headers.get(header::ALLOW) {
        rendered.headers_mut().insert(header::ALLOW, allow.clone());
    }
    rendered
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
