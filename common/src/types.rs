//! 共通型定義
//!
//! DeviceAddress, RegistryEntry等のドメインモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// デバイスの最終既知アドレス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceAddress {
    /// IPアドレスまたはホスト名
    pub ip: String,
    /// ポート番号（文字列のまま保持）
    pub port: String,
}

impl DeviceAddress {
    /// 新しいアドレスを作成
    pub fn new(ip: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port: port.into(),
        }
    }

    /// デバイスへの問い合わせURL（パスは付与しない）
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.ip, self.port)
    }
}

/// レジストリの1エントリ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryEntry {
    /// Aqmanシリアル（主キー）
    pub serial: String,
    /// 最終既知アドレス
    #[serde(flatten)]
    pub address: DeviceAddress,
    /// 初回登録日時
    pub registered_at: DateTime<Utc>,
    /// 最終更新日時
    pub updated_at: DateTime<Utc>,
    /// 受理したレポート数
    pub report_count: i64,
}
