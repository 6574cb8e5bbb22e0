//! Repository traitパターン定義
//!
//! DB操作を抽象化し、テスタビリティを向上させるためのtrait。
//! traitの各メソッドは `db::devices` のフリー関数に対応する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use aqman_gateway_common::{
    protocol::RegisterStatus,
    types::{DeviceAddress, RegistryEntry},
};

use super::devices;

/// Aqmanレジストリ操作のRepository trait
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// 登録済みシリアル一覧を取得
    async fn list_serials(&self) -> Result<Vec<String>, sqlx::Error>;
    /// シリアルからアドレスを取得
    async fn get_address(&self, serial: &str) -> Result<Option<DeviceAddress>, sqlx::Error>;
    /// シリアルが登録済みか確認
    async fn exists(&self, serial: &str) -> Result<bool, sqlx::Error>;
    /// エントリ全体を取得
    async fn get_entry(&self, serial: &str) -> Result<Option<RegistryEntry>, sqlx::Error>;
    /// アドレスを登録または更新
    async fn upsert(
        &self,
        serial: &str,
        address: &DeviceAddress,
        at: DateTime<Utc>,
    ) -> Result<RegisterStatus, sqlx::Error>;
}

/// SQLite実装
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// 新しいリポジトリを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRepository for SqliteDeviceRepository {
    async fn list_serials(&self) -> Result<Vec<String>, sqlx::Error> {
        devices::list_serials(&self.pool).await
    }

    async fn get_address(&self, serial: &str) -> Result<Option<DeviceAddress>, sqlx::Error> {
        devices::get_address(&self.pool, serial).await
    }

    async fn exists(&self, serial: &str) -> Result<bool, sqlx::Error> {
        devices::exists(&self.pool, serial).await
    }

    async fn get_entry(&self, serial: &str) -> Result<Option<RegistryEntry>, sqlx::Error> {
        devices::get_entry(&self.pool, serial).await
    }

    async fn upsert(
        &self,
        serial: &str,
        address: &DeviceAddress,
        at: DateTime<Utc>,
    ) -> Result<RegisterStatus, sqlx::Error> {
        devices::upsert(&self.pool, serial, address, at).await
    }
}
