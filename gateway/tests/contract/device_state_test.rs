//! Contract Test: GET /api/device/:sn

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use crate::support::{
    gateway::{create_test_state, report_device, spawn_gateway},
    http::{closed_port, spawn_router, TestServer},
};
use aqman_gateway_common::{error::ErrorResponse, protocol::DeviceState};
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Clone)]
struct DeviceStubState {
    payload: Value,
    delay: Duration,
    hits: Arc<AtomicUsize>,
}

async fn spawn_device_stub(payload: Value, delay: Duration) -> (TestServer, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/", get(device_handler))
        .with_state(DeviceStubState {
            payload,
            delay,
            hits: hits.clone(),
        });

    (spawn_router(router).await, hits)
}

async fn device_handler(State(state): State<DeviceStubState>) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.delay).await;
    Json(state.payload.clone())
}

#[tokio::test]
async fn get_unknown_device_returns_no_device_found() {
    let gateway = spawn_gateway().await;

    let response = reqwest::get(format!("http://{}/api/device/NEVER-SEEN", gateway.addr()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error.code, "NoDeviceFound");
    assert_eq!(body.error.message, "The request is malformed.");

    gateway.stop().await;
}

#[tokio::test]
async fn report_then_get_proxies_device_state() {
    let (device, hits) = spawn_device_stub(
        json!({
            "sn": "ABC123",
            "dsm101_sn": "DSM-42",
            "dt": "2020-01-01T00:00:00Z",
            "temp": 21.5,
            "humi": 45.2,
            "co2": 400,
            "pm1": 3,
            "pm2d5": 7,
            "pm10": 11,
            "radon": 20,
            "tvoc": 150
        }),
        Duration::ZERO,
    )
    .await;
    let gateway = spawn_gateway().await;

    let response = report_device(
        gateway.addr(),
        "ABC123",
        &device.addr().ip().to_string(),
        &device.addr().port().to_string(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let before_get = Utc::now();

    let response = reqwest::get(format!("http://{}/api/device/ABC123", gateway.addr()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state: DeviceState = response.json().await.unwrap();
    assert_eq!(state.sn, "ABC123");
    assert_eq!(state.dsm101_sn, "DSM-42");
    assert_eq!(state.temp, 21.5);
    assert_eq!(state.co2, 400);
    assert_eq!(state.tvoc, 150);
    // dtはGET時点の時刻（デバイスの値やPOST時刻ではない）
    assert!(state.dt >= before_get);
    assert!(state.dt <= Utc::now());
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    gateway.stop().await;
    device.stop().await;
}

#[tokio::test]
async fn loosely_typed_device_payload_keeps_real_readings() {
    let (device, _) = spawn_device_stub(
        json!({
            "sn": "LOOSE-1",
            "temp": 19.0,
            "co2": 400.0,
            "radon": null
        }),
        Duration::ZERO,
    )
    .await;
    let gateway = spawn_gateway().await;

    report_device(
        gateway.addr(),
        "LOOSE-1",
        &device.addr().ip().to_string(),
        &device.addr().port().to_string(),
    )
    .await
    .unwrap();

    let response = reqwest::get(format!("http://{}/api/device/LOOSE-1", gateway.addr()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state: DeviceState = response.json().await.unwrap();
    assert!(!state.is_sentinel());
    assert_eq!(state.temp, 19.0);
    assert_eq!(state.co2, 400);
    assert_eq!(state.radon, 0);

    gateway.stop().await;
    device.stop().await;
}

#[tokio::test]
async fn get_unreachable_device_returns_sentinel_state() {
    let gateway = spawn_gateway().await;
    let port = closed_port();

    report_device(gateway.addr(), "OFFLINE-1", "127.0.0.1", &port.to_string())
        .await
        .unwrap();

    let response = reqwest::get(format!("http://{}/api/device/OFFLINE-1", gateway.addr()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["sn"], "OFFLINE-1");
    assert_eq!(body["dsm101_sn"], "OFFLINE-1");
    for field in ["temp", "humi", "co2", "pm1", "pm2d5", "pm10", "radon", "tvoc"] {
        assert_eq!(body[field].as_f64(), Some(-1.0), "field {}", field);
    }

    gateway.stop().await;
}

#[tokio::test]
async fn get_slow_device_is_bounded_by_timeout() {
    let (device, _) = spawn_device_stub(json!({"temp": 20.0}), Duration::from_secs(5)).await;
    let state = create_test_state(1).await;
    let gateway = spawn_router(aqman_gateway::api::create_router(state)).await;

    report_device(
        gateway.addr(),
        "SLOW-1",
        &device.addr().ip().to_string(),
        &device.addr().port().to_string(),
    )
    .await
    .unwrap();

    let started = Instant::now();
    let response = reqwest::get(format!("http://{}/api/device/SLOW-1", gateway.addr()))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(response.status(), StatusCode::OK);
    let state: DeviceState = response.json().await.unwrap();
    assert!(state.is_sentinel());

    gateway.stop().await;
}
