//! Contract Test: GET /api/devices

use std::collections::HashSet;

use crate::support::gateway::{report_device, spawn_gateway};
use aqman_gateway_common::protocol::DeviceList;
use reqwest::StatusCode;

#[tokio::test]
async fn list_devices_empty_registry_returns_empty_array() {
    let gateway = spawn_gateway().await;

    let response = reqwest::get(format!("http://{}/api/devices", gateway.addr()))
        .await
        .expect("list request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"devices": []}));

    gateway.stop().await;
}

#[tokio::test]
async fn list_devices_returns_each_reported_serial_once() {
    let gateway = spawn_gateway().await;
    let serials: Vec<String> = (0..5).map(|i| format!("AQM-{:04}", i)).collect();

    for serial in &serials {
        for port in ["8080", "8081"] {
            let response = report_device(gateway.addr(), serial, "10.0.0.5", port)
                .await
                .expect("report should succeed");
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    let list: DeviceList = reqwest::get(format!("http://{}/api/devices", gateway.addr()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(list.devices.len(), serials.len());
    let listed: HashSet<_> = list.devices.into_iter().collect();
    let expected: HashSet<_> = serials.into_iter().collect();
    assert_eq!(listed, expected);

    gateway.stop().await;
}
