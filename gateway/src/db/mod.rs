//! データベースアクセス層
//!
//! SQLiteベースのデバイスレジストリ永続化

/// Aqmanテーブル操作
pub mod devices;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

use aqman_gateway_common::error::{GatewayError, GatewayResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 書き込み競合時の待機上限
const BUSY_TIMEOUT_SECS: u64 = 5;

/// ファイルDBの最大接続数
const MAX_CONNECTIONS: u32 = 5;

/// SQLiteデータベース接続プールを作成してマイグレーションを実行
///
/// ファイルDBの場合は親ディレクトリとDBファイルを必要に応じて作成する。
/// `sqlite::memory:` の場合は単一接続のプールを返す（接続ごとに別DBになるため）。
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:///usr/src/aqmandb/aqman.db"）
pub async fn initialize_database(database_url: &str) -> GatewayResult<SqlitePool> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| GatewayError::Database(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

    let (options, pool_options) = if in_memory {
        (
            options,
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        )
    } else {
        ensure_parent_dir(options.get_filename())?;
        (
            options.journal_mode(SqliteJournalMode::Wal),
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS),
        )
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| GatewayError::Database(format!("Failed to connect to database: {}", e)))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
pub async fn run_migrations(pool: &SqlitePool) -> GatewayResult<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| GatewayError::Database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> GatewayResult<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !parent.exists() {
        tracing::info!(dir = %parent.display(), "Creating database directory");
        std::fs::create_dir_all(parent).map_err(|e| {
            GatewayError::Database(format!(
                "Failed to create database directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    Ok(())
}
