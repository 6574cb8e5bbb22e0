//! デバイスレジストリ
//!
//! シリアル → 最終既知アドレスの永続マッピング。
//! ストレージ障害はログに記録し、「未登録」または no-op として扱う。

use std::sync::Arc;

use aqman_gateway_common::{
    protocol::RegisterStatus,
    types::{DeviceAddress, RegistryEntry},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, error};

use crate::db::traits::{DeviceRepository, SqliteDeviceRepository};

/// デバイスレジストリ
#[derive(Clone)]
pub struct DeviceRegistry {
    repository: Arc<dyn DeviceRepository>,
}

impl DeviceRegistry {
    /// SQLiteプールからレジストリを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_repository(Arc::new(SqliteDeviceRepository::new(pool)))
    }

    /// 任意のリポジトリ実装からレジストリを作成
    pub fn with_repository(repository: Arc<dyn DeviceRepository>) -> Self {
        Self { repository }
    }

    /// 登録済みシリアル一覧
    pub async fn list_serials(&self) -> Vec<String> {
        match self.repository.list_serials().await {
            Ok(serials) => serials,
            Err(e) => {
                error!(error = %e, "Failed to list device serials");
                Vec::new()
            }
        }
    }

    /// シリアルからアドレスを検索（未登録なら `None`）
    pub async fn lookup(&self, serial: &str) -> Option<DeviceAddress> {
        match self.repository.get_address(serial).await {
            Ok(address) => address.filter(|a| !a.ip.is_empty() && !a.port.is_empty()),
            Err(e) => {
                error!(serial, error = %e, "Failed to look up device address");
                None
            }
        }
    }

    /// シリアルが登録済みか
    pub async fn exists(&self, serial: &str) -> bool {
        match self.repository.exists(serial).await {
            Ok(found) => found,
            Err(e) => {
                error!(serial, error = %e, "Failed to check device existence");
                false
            }
        }
    }

    /// エントリ全体を取得
    pub async fn entry(&self, serial: &str) -> Option<RegistryEntry> {
        match self.repository.get_entry(serial).await {
            Ok(entry) => entry,
            Err(e) => {
                error!(serial, error = %e, "Failed to load registry entry");
                None
            }
        }
    }

    /// アドレスを登録または更新
    ///
    /// ストレージ障害時は `None`（書き込みは行われない）。
    pub async fn upsert(
        &self,
        serial: &str,
        address: &DeviceAddress,
        at: DateTime<Utc>,
    ) -> Option<RegisterStatus> {
        match self.repository.upsert(serial, address, at).await {
            Ok(status) => {
                debug!(serial, ip = %address.ip, port = %address.port, ?status, "Device address stored");
                Some(status)
            }
            Err(e) => {
                error!(serial, error = %e, "Failed to store device address");
                None
            }
        }
    }
}
