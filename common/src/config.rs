//! 設定管理
//!
//! GatewayConfig設定構造体

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// Gateway設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// データベースURL (デフォルト: "sqlite:///usr/src/aqmandb/aqman.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// ログファイルパス（未指定の場合は標準出力のみ）
    #[serde(default)]
    pub log_file: Option<String>,

    /// デバイス問い合わせのタイムアウト（秒）(デフォルト: 5)
    #[serde(default = "default_device_timeout")]
    pub device_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite:///usr/src/aqmandb/aqman.db".to_string()
}

fn default_device_timeout() -> u64 {
    5
}

impl GatewayConfig {
    /// バインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 起動前の設定値チェック
    pub fn validate(&self) -> CommonResult<()> {
        if self.host.trim().is_empty() {
            return Err(CommonError::Config("host must not be empty".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(CommonError::Config(
                "database URL must not be empty".to_string(),
            ));
        }
        if self.device_timeout_secs == 0 {
            return Err(CommonError::Config(
                "device timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            log_file: None,
            device_timeout_secs: default_device_timeout(),
        }
    }
}
