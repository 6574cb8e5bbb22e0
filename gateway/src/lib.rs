//! Aqman Gateway Server
//!
//! Aqmanデバイスのアドレスを管理し、状態取得をデバイスへ中継するサーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// Aqmanデバイスクライアント
pub mod device;

/// ロギング初期化ユーティリティ
pub mod logging;

/// デバイスレジストリ
pub mod registry;

/// サーバー起動・シャットダウン
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// デバイスレジストリ
    pub registry: registry::DeviceRegistry,
    /// デバイスクライアント（接続プーリング有効）
    pub device_client: device::DeviceClient,
}
