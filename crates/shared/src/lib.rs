//! # Paperless Relay 共有ユーティリティ
//!
//! このクレートは、Paperless Relay
//! のすべてのクレートで使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain 以外）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（トレーシング関連は `observability` feature）

pub mod event_log;
pub mod health;
pub mod observability;
pub mod relay_response;

pub use health::HealthResponse;
pub use relay_response::{ErrorBody, MessageResponse, ScanResponse};
