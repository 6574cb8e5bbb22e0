use std::net::SocketAddr;

use aqman_gateway::{bootstrap, AppState};
use aqman_gateway_common::config::GatewayConfig;
use reqwest::{Client, Response};
use serde_json::json;

use super::http::{spawn_router, TestServer};

/// インメモリDBのGatewayを実ポートで起動する
pub async fn spawn_gateway() -> TestServer {
    let state = create_test_state(1).await;
    spawn_router(aqman_gateway::api::create_router(state)).await
}

/// テスト用のAppStateを作成する
pub async fn create_test_state(device_timeout_secs: u64) -> AppState {
    let config = GatewayConfig {
        database_url: "sqlite::memory:".to_string(),
        device_timeout_secs,
        ..GatewayConfig::default()
    };

    bootstrap::initialize(&config)
        .await
        .expect("Failed to initialize gateway")
        .state
}

/// Aqmanとしてネットワーク情報を報告する
pub async fn report_device(
    gateway: SocketAddr,
    serial: &str,
    ip: &str,
    port: &str,
) -> reqwest::Result<Response> {
    Client::new()
        .post(format!("http://{}/api/device/{}", gateway, serial))
        .json(&json!({
            "ip": ip,
            "netmask": "255.255.255.0",
            "gateway": "192.168.0.1",
            "nameserver": "192.168.0.1",
            "port": port,
            "sn": serial,
            "dt": "2024-05-01T09:00:00Z"
        }))
        .send()
        .await
}
