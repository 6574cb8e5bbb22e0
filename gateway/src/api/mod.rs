//! REST APIハンドラー
//!
//! デバイス一覧、デバイス状態プロキシ、ネットワーク情報レポート

pub mod devices;
pub mod error;

use crate::AppState;
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/devices", get(devices::list_devices))
        .route(
            "/api/device/:sn",
            get(devices::get_device_state).post(devices::report_device_state),
        )
        .fallback(error::unknown_route)
        .layer(middleware::map_response(error::structured_rejections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
