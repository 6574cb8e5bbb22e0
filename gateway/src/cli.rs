//! CLI module for aqman-gateway
//!
//! コマンドライン引数は環境変数より優先される。

use std::path::PathBuf;

use aqman_gateway_common::config::GatewayConfig;
use clap::{Args, Parser, Subcommand};

use crate::config::{gateway_config_from_env, log_file_from_env};

/// Aqman gateway - device registry and state proxy for Aqman air-quality units
#[derive(Parser, Debug)]
#[command(name = "aqman-gateway")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AQMAN_HOST                  Bind address (default: 0.0.0.0)
    AQMAN_PORT                  Listen port (default: 8080, legacy: SERVER_PORT)
    AQMAN_DATABASE_URL          Database URL (legacy: DATABASE_URL)
    AQMAN_LOG_FILE              Log file path (legacy: LOG_FILE_LOCATION)
    AQMAN_LOG_LEVEL             Log level (default: info)
    AQMAN_DEVICE_TIMEOUT_SECS   Device query timeout in seconds (default: 5)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway server (default)
    Serve(ServeArgs),
}

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Database URL (e.g. sqlite:///usr/src/aqmandb/aqman.db)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Log file path (rotated daily)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Device query timeout in seconds
    #[arg(long)]
    pub device_timeout_secs: Option<u64>,
}

impl ServeArgs {
    /// ログファイルパスだけを先に解決する（引数 > 環境変数）
    ///
    /// ロギング初期化前に呼ぶため、警告は出さない。
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| log_file_from_env().map(PathBuf::from))
    }

    /// 環境変数の設定に引数を上書きして最終的な設定を得る
    pub fn resolve(self) -> GatewayConfig {
        self.apply(gateway_config_from_env())
    }

    fn apply(self, mut config: GatewayConfig) -> GatewayConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file.to_string_lossy().into_owned());
        }
        if let Some(secs) = self.device_timeout_secs {
            config.device_timeout_secs = secs;
        }
        config
    }
}
