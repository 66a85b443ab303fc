//! # Paperless Relay インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートは外部サービスの詳細をカプセル化し、サービス層には trait だけを見せる。
//! サービス層は `Arc<dyn NotificationSender>` / `Arc<dyn ObjectStore>` を受け取り、
//! テストではモックに差し替える。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP（lettre、暗黙的 TLS）と Noop
//! - **オブジェクトストレージ**: S3 互換 API（aws-sdk-s3）によるキー一覧とダウンロード
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信
//! - [`object_store`] - オブジェクトストレージ接続
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use paperless_relay_infra::object_store::{self, AwsObjectStore, StorageClientConfig};
//!
//! async fn setup() {
//!     let client = object_store::create_client(&StorageClientConfig::default()).await;
//!     let store = AwsObjectStore::new(client, "relay-documents".to_string());
//! }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod object_store;

pub use error::{InfraError, InfraErrorKind};
pub use notification::NotificationSender;
pub use object_store::{ObjectStore, StoredObject};
