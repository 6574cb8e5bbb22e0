//! 契約テスト共通ユーティリティ

pub mod gateway;
pub mod http;
