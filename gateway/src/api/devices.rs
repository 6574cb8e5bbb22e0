//! Aqmanデバイス APIハンドラー
//!
//! - `GET  /api/devices`      登録済みシリアル一覧
//! - `GET  /api/device/:sn`   デバイス状態の取得（デバイスへプロキシ）
//! - `POST /api/device/:sn`   ネットワーク情報レポートの受付

use aqman_gateway_common::{
    error::{CommonError, GatewayError},
    protocol::{DeviceList, DeviceState, NetworkReport, ReportResponse},
    types::DeviceAddress,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use super::error::AppError;
use crate::{device::DeviceQuery, AppState};

/// GET /api/devices - 登録済みシリアル一覧
pub async fn list_devices(State(state): State<AppState>) -> Json<DeviceList> {
    let devices = state.registry.list_serials().await;
    Json(DeviceList { devices })
}

/// GET /api/device/:sn - デバイス状態取得
///
/// デバイスに到達できない場合もエラーにはせず、センチネル値（-1）で埋めた状態を返す。
pub async fn get_device_state(
    State(state): State<AppState>,
    Path(sn): Path<String>,
) -> Result<Json<DeviceState>, AppError> {
    let address = state
        .registry
        .lookup(&sn)
        .await
        .ok_or_else(|| GatewayError::DeviceNotFound(sn.clone()))?;

    let device_state = match state.device_client.query(&address).await {
        DeviceQuery::Reported(reading) => DeviceState::from_reading(&sn, reading, Utc::now()),
        DeviceQuery::Unreachable(reason) => {
            warn!(serial = %sn, url = %address.base_url(), %reason, "Aqman unreachable, returning sentinel state");
            DeviceState::unreachable(&sn, Utc::now())
        }
        DeviceQuery::InvalidResponse(reason) => {
            warn!(serial = %sn, url = %address.base_url(), %reason, "Aqman returned an invalid response, returning sentinel state");
            DeviceState::unreachable(&sn, Utc::now())
        }
    };

    Ok(Json(device_state))
}

/// POST /api/device/:sn - ネットワーク情報レポート受付
///
/// ボディはContent-Typeに関わらずJSONとして解釈する。
pub async fn report_device_state(
    State(state): State<AppState>,
    Path(sn): Path<String>,
    body: Bytes,
) -> Result<Json<ReportResponse>, AppError> {
    if body.is_empty() {
        return Err(GatewayError::MalformedRequest("request body is empty".to_string()).into());
    }

    let report: NetworkReport = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::from(CommonError::from(e)))?;
    report.validate().map_err(GatewayError::from)?;

    if report.sn != sn {
        return Err(GatewayError::SerialMismatch {
            path: sn,
            body: report.sn,
        }
        .into());
    }

    info!(
        serial = %report.sn,
        ip = %report.ip,
        port = %report.port,
        netmask = %report.netmask,
        gateway = %report.gateway,
        nameserver = %report.nameserver,
        "Received network report"
    );

    let address = DeviceAddress::new(report.ip, report.port);
    let status = state.registry.upsert(&sn, &address, Utc::now()).await;

    Ok(Json(ReportResponse { sn, status }))
}
