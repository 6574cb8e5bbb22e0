//! ロギング初期化ユーティリティ
//!
//! 標準出力に加え、ログファイルが指定されていれば日次ローテーションのファイルにも出力する。

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 保持するローテーション済みログファイル数
const MAX_LOG_FILES: usize = 3;

const DEFAULT_LOG_FILE_NAME: &str = "aqman-gateway.log";

/// ログ出力を初期化する
///
/// ログレベルは `AQMAN_LOG_LEVEL`、次に `RUST_LOG`、どちらもなければ `info`。
/// 戻り値の [`WorkerGuard`] はプロセス終了まで保持すること（Drop時に未書き込みのログをフラッシュする）。
pub fn init(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (dir, prefix) = log_file_parts(path);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(prefix)
                .max_log_files(MAX_LOG_FILES)
                .build(&dir)
                .context("failed to create rolling log file appender")?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    let directive = std::env::var("AQMAN_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// ログファイルパスをディレクトリとファイル名プレフィックスに分解する
fn log_file_parts(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE_NAME)
        .to_string();

    (dir, prefix)
}
