//! 通信プロトコル定義
//!
//! Aqman↔Gateway間、およびクライアント↔Gateway間の通信メッセージ

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// 取得できなかったセンサー値のプレースホルダー
pub const SENTINEL: i64 = -1;

/// ネットワーク情報レポート（Aqman → Gateway）
///
/// `POST /api/device/{sn}` のリクエストボディ。
/// 永続化されるのは `sn` / `ip` / `port` のみで、タイムスタンプはGateway側で付与する。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkReport {
    /// IPアドレスまたはホスト名
    #[serde(default)]
    pub ip: String,
    /// サブネットマスク
    #[serde(default)]
    pub netmask: String,
    /// デフォルトゲートウェイ
    #[serde(default)]
    pub gateway: String,
    /// DNSサーバー
    #[serde(default)]
    pub nameserver: String,
    /// ポート番号（文字列）
    #[serde(default)]
    pub port: String,
    /// Aqmanシリアル
    #[serde(default)]
    pub sn: String,
    /// デバイス側の時刻（保存されない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<DateTime<Utc>>,
}

impl NetworkReport {
    /// 必須フィールド（`sn`, `ip`, `port`）の存在チェック
    pub fn validate(&self) -> CommonResult<()> {
        for (name, value) in [("sn", &self.sn), ("ip", &self.ip), ("port", &self.port)] {
            if value.trim().is_empty() {
                return Err(CommonError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Aqmanが返すセンサースナップショット
///
/// デバイスの応答ボディをデコードするための型。
/// 欠けているフィールド、`null`、型の合わないフィールドはゼロ値になり、
/// 他のフィールドはそのまま読み取る。`dt` は無視される。
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DeviceReading {
    /// Aqmanシリアル
    #[serde(default, deserialize_with = "lenient::string")]
    pub sn: String,
    /// DSM101シリアル
    #[serde(default, deserialize_with = "lenient::string")]
    pub dsm101_sn: String,
    /// 温度 (℃)
    #[serde(default, deserialize_with = "lenient::float")]
    pub temp: f64,
    /// 湿度 (%)
    #[serde(default, deserialize_with = "lenient::float")]
    pub humi: f64,
    /// CO2 (ppm)
    #[serde(default, deserialize_with = "lenient::integer")]
    pub co2: i64,
    /// PM1.0
    #[serde(default, deserialize_with = "lenient::integer")]
    pub pm1: i64,
    /// PM2.5
    #[serde(default, deserialize_with = "lenient::integer")]
    pub pm2d5: i64,
    /// PM10
    #[serde(default, deserialize_with = "lenient::integer")]
    pub pm10: i64,
    /// ラドン
    #[serde(default, deserialize_with = "lenient::integer")]
    pub radon: i64,
    /// TVOC
    #[serde(default, deserialize_with = "lenient::integer")]
    pub tvoc: i64,
}

impl DeviceReading {
    /// デバイスの応答ボディをデコードする
    ///
    /// JSONオブジェクトでないボディだけをエラーとする。
    pub fn from_slice(body: &[u8]) -> CommonResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(CommonError::Serialization(serde::de::Error::custom(
                "device response is not a JSON object",
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// フィールド単位の寛容なデシリアライザ
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or(0.0))
    }

    /// 小数は切り捨てる
    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0),
            _ => 0,
        })
    }
}

/// 正規化済みデバイス状態（Gateway → クライアント）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceState {
    /// Aqmanシリアル
    pub sn: String,
    /// DSM101シリアル
    pub dsm101_sn: String,
    /// 取得時刻（Gatewayの時刻）
    pub dt: DateTime<Utc>,
    /// 温度 (℃)
    pub temp: f64,
    /// 湿度 (%)
    pub humi: f64,
    /// CO2 (ppm)
    pub co2: i64,
    /// PM1.0
    pub pm1: i64,
    /// PM2.5
    pub pm2d5: i64,
    /// PM10
    pub pm10: i64,
    /// ラドン
    pub radon: i64,
    /// TVOC
    pub tvoc: i64,
}

impl DeviceState {
    /// デバイス応答から状態を作成する
    ///
    /// `dt` は常に `now` で上書きする。デバイスが `sn` を返さなかった場合は
    /// 要求されたシリアルで補う。
    pub fn from_reading(serial: &str, reading: DeviceReading, now: DateTime<Utc>) -> Self {
        let sn = if reading.sn.is_empty() {
            serial.to_string()
        } else {
            reading.sn
        };

        Self {
            sn,
            dsm101_sn: reading.dsm101_sn,
            dt: now,
            temp: reading.temp,
            humi: reading.humi,
            co2: reading.co2,
            pm1: reading.pm1,
            pm2d5: reading.pm2d5,
            pm10: reading.pm10,
            radon: reading.radon,
            tvoc: reading.tvoc,
        }
    }

    /// 応答しないデバイス向けのセンチネル状態
    pub fn unreachable(serial: &str, now: DateTime<Utc>) -> Self {
        Self {
            sn: serial.to_string(),
            dsm101_sn: serial.to_string(),
            dt: now,
            temp: SENTINEL as f64,
            humi: SENTINEL as f64,
            co2: SENTINEL,
            pm1: SENTINEL,
            pm2d5: SENTINEL,
            pm10: SENTINEL,
            radon: SENTINEL,
            tvoc: SENTINEL,
        }
    }

    /// 全センサー値がセンチネルかどうか
    pub fn is_sentinel(&self) -> bool {
        let sentinel = SENTINEL as f64;
        self.temp == sentinel
            && self.humi == sentinel
            && [
                self.co2, self.pm1, self.pm2d5, self.pm10, self.radon, self.tvoc,
            ]
            .iter()
            .all(|v| *v == SENTINEL)
    }
}

/// デバイス一覧レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceList {
    /// 登録済みシリアル一覧
    pub devices: Vec<String>,
}

/// 登録ステータス
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegisterStatus {
    /// 新規登録
    Registered,
    /// 既存デバイス更新
    Updated,
}

/// ネットワーク情報レポートへのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportResponse {
    /// Aqmanシリアル
    pub sn: String,
    /// 登録結果（ストレージ障害時は省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RegisterStatus>,
}
