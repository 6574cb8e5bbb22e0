//! Aqmanデバイスクライアント
//!
//! 登録済みアドレスに `GET http://{ip}:{port}` を送り、センサースナップショットを取得する。
//! 失敗はエラーとして返さず、種類ごとに [`DeviceQuery`] で表現する。

use std::time::Duration;

use aqman_gateway_common::{
    error::{GatewayError, GatewayResult},
    protocol::DeviceReading,
    types::DeviceAddress,
};
use reqwest::Client;

/// 接続確立タイムアウトの上限
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// デバイス問い合わせ結果
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceQuery {
    /// デバイスが応答し、ボディをデコードできた
    Reported(DeviceReading),
    /// 接続失敗・タイムアウト等でデバイスに到達できなかった
    Unreachable(String),
    /// 応答はあったがステータスまたはボディが不正
    InvalidResponse(String),
}

/// Aqmanデバイスクライアント
#[derive(Clone)]
pub struct DeviceClient {
    client: Client,
}

impl DeviceClient {
    /// 全体タイムアウトを指定してクライアントを作成
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// デバイスに現在の状態を問い合わせる
    pub async fn query(&self, address: &DeviceAddress) -> DeviceQuery {
        let url = address.base_url();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    format!("timed out: {}", e)
                } else {
                    e.to_string()
                };
                return DeviceQuery::Unreachable(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return DeviceQuery::InvalidResponse(format!("device returned {}", status));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return DeviceQuery::Unreachable(format!("failed to read body: {}", e)),
        };

        match DeviceReading::from_slice(&body) {
            Ok(reading) => DeviceQuery::Reported(reading),
            Err(e) => DeviceQuery::InvalidResponse(format!("undecodable body: {}", e)),
        }
    }
}
