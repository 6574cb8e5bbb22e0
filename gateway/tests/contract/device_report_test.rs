//! Contract Test: POST /api/device/:sn

use crate::support::gateway::{report_device, spawn_gateway};
use aqman_gateway_common::{
    error::ErrorResponse,
    protocol::{DeviceList, RegisterStatus, ReportResponse},
};
use reqwest::{Client, StatusCode};
use serde_json::json;

#[tokio::test]
async fn report_registers_then_updates() {
    let gateway = spawn_gateway().await;

    let first: ReportResponse = report_device(gateway.addr(), "ABC123", "10.0.0.5", "8080")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.sn, "ABC123");
    assert_eq!(first.status, Some(RegisterStatus::Registered));

    let second: ReportResponse = report_device(gateway.addr(), "ABC123", "10.0.0.9", "9090")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second.status, Some(RegisterStatus::Updated));

    gateway.stop().await;
}

#[tokio::test]
async fn report_with_mismatched_serial_is_rejected_and_server_survives() {
    let gateway = spawn_gateway().await;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/device/ABC123", gateway.addr()))
        .json(&json!({
            "ip": "10.0.0.5",
            "port": "8080",
            "sn": "OTHER-1"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error.code, "SerialMismatch");

    // プロセスは終了せず、次のリクエストも処理できる
    let list: DeviceList = client
        .get(format!("http://{}/api/devices", gateway.addr()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.devices.is_empty());

    gateway.stop().await;
}

#[tokio::test]
async fn report_missing_required_field_is_rejected() {
    let gateway = spawn_gateway().await;

    let response = Client::new()
        .post(format!("http://{}/api/device/ABC123", gateway.addr()))
        .json(&json!({
            "port": "8080",
            "sn": "ABC123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error.code, "MissingRequiredField");
    assert!(body.error.details.contains("ip"));

    gateway.stop().await;
}

#[tokio::test]
async fn report_with_invalid_json_is_rejected() {
    let gateway = spawn_gateway().await;

    let response = Client::new()
        .post(format!("http://{}/api/device/ABC123", gateway.addr()))
        .header("content-type", "application/json")
        .body("{\"sn\": \"ABC123\", \"port\": 8080")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error.code, "MalformedRequest");

    gateway.stop().await;
}
