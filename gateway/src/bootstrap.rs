//! サーバー初期化
//!
//! データベース、レジストリ、デバイスクライアントを構築して `AppState` を組み立てる。

use std::time::Duration;

use aqman_gateway_common::{config::GatewayConfig, error::GatewayResult};
use sqlx::SqlitePool;
use tracing::info;

use crate::{db, device::DeviceClient, registry::DeviceRegistry, AppState};

/// サーバー初期化結果
///
/// `db_pool` はシャットダウン時にクローズするために保持する。
pub struct InitContext {
    /// アプリケーション状態
    pub state: AppState,
    /// データベース接続プール
    pub db_pool: SqlitePool,
}

/// サーバー初期化を実行する
pub async fn initialize(config: &GatewayConfig) -> GatewayResult<InitContext> {
    config.validate()?;

    info!(database_url = %config.database_url, "Initializing registry storage");
    let db_pool = db::initialize_database(&config.database_url).await?;

    let registry = DeviceRegistry::new(db_pool.clone());
    let device_client = DeviceClient::new(Duration::from_secs(config.device_timeout_secs))?;
    info!(
        timeout_secs = config.device_timeout_secs,
        "Device client initialized"
    );

    Ok(InitContext {
        state: AppState {
            registry,
            device_client,
        },
        db_pool,
    })
}
