//! Aqmanテーブル操作
//!
//! シリアル → 最終既知アドレスの単一テーブル

use aqman_gateway_common::{
    protocol::RegisterStatus,
    types::{DeviceAddress, RegistryEntry},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// 登録済みシリアル一覧を取得（シリアル昇順）
pub async fn list_serials(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT serial FROM aqman ORDER BY serial ASC")
        .fetch_all(pool)
        .await
}

/// シリアルからアドレスを取得
pub async fn get_address(
    pool: &SqlitePool,
    serial: &str,
) -> Result<Option<DeviceAddress>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String)>("SELECT ip, port FROM aqman WHERE serial = ?")
        .bind(serial)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(ip, port)| DeviceAddress { ip, port }))
}

/// シリアルが登録済みか確認
pub async fn exists(pool: &SqlitePool, serial: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM aqman WHERE serial = ?")
        .bind(serial)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// エントリ全体を取得
pub async fn get_entry(
    pool: &SqlitePool,
    serial: &str,
) -> Result<Option<RegistryEntry>, sqlx::Error> {
    let row = sqlx::query_as::<_, DeviceRow>(
        r#"
        SELECT serial, ip, port, registered_at, updated_at, report_count
        FROM aqman
        WHERE serial = ?
        "#,
    )
    .bind(serial)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// アドレスを登録または更新
///
/// 単一のUPSERT文で実行するため、部分的な書き込みは観測されない。
/// 戻り値の `report_count` が1なら新規登録。
pub async fn upsert(
    pool: &SqlitePool,
    serial: &str,
    address: &DeviceAddress,
    at: DateTime<Utc>,
) -> Result<RegisterStatus, sqlx::Error> {
    let timestamp = at.to_rfc3339();

    let report_count = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO aqman (serial, ip, port, registered_at, updated_at, report_count)
        VALUES (?, ?, ?, ?, ?, 1)
        ON CONFLICT(serial) DO UPDATE SET
            ip = excluded.ip,
            port = excluded.port,
            updated_at = excluded.updated_at,
            report_count = aqman.report_count + 1
        RETURNING report_count
        "#,
    )
    .bind(serial)
    .bind(&address.ip)
    .bind(&address.port)
    .bind(&timestamp)
    .bind(&timestamp)
    .fetch_one(pool)
    .await?;

    Ok(if report_count == 1 {
        RegisterStatus::Registered
    } else {
        RegisterStatus::Updated
    })
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    serial: String,
    ip: String,
    port: String,
    registered_at: String,
    updated_at: String,
    report_count: i64,
}

impl From<DeviceRow> for RegistryEntry {
    fn from(row: DeviceRow) -> Self {
        RegistryEntry {
            serial: row.serial,
            address: DeviceAddress {
                ip: row.ip,
                port: row.port,
            },
            registered_at: parse_timestamp(&row.registered_at),
            updated_at: parse_timestamp(&row.updated_at),
            report_count: row.report_count,
        }
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(value, error = %e, "Invalid timestamp in aqman table");
            DateTime::<Utc>::default()
        })
}
