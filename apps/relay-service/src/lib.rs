//! # Paperless Relay Service
//!
//! オブジェクトストレージに置かれた書類を、キーに埋め込まれた宛先へ
//! メールで届けるリレーサービス。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーターとミドルウェアの組み立て
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー定義と HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `scheduler`: 毎日のバケット走査タスク
//! - `usecase`: 即時送信・バケット走査・ウェルカムメール

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod scheduler;
pub mod usecase;
