//! # Paperless Relay ドメイン層
//!
//! 通知リレーの中核となるドメインモデルとルールを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: SMTP やオブジェクトストレージへのアクセスはインフラ層の責務
//! - **判定ロジックの純粋性**: オブジェクトキーの照合や宛先解決は入力だけで決まる
//! - **時刻の注入**: 「今日」は [`clock::Clock`] から取得し、テストで固定できる
//!
//! ## 依存関係の方向
//!
//! ```text
//! relay-service → infra → domain
//!        ↘                  ↑
//!          ─────────────────
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻プロバイダ
//! - [`encoding`] - 添付ファイルの base64 変換（パディング補修を含む）
//! - [`notification`] - メールメッセージ、添付ファイル、宛先解決
//! - [`object_key`] - オブジェクトキーの解析と当日照合
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::NaiveDate;
//! use paperless_relay_domain::object_key::{DateToken, MatchPolicy};
//!
//! let policy = MatchPolicy::new("v2", ["repairs", "installations"]);
//! let today = DateToken::for_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
//!
//! let scheduled = policy
//!     .evaluate("v2/alice@x.com/repairs/24-07-01_order.pdf", &today)
//!     .unwrap();
//! assert_eq!(scheduled.recipient, "alice@x.com");
//! ```

pub mod clock;
pub mod encoding;
pub mod notification;
pub mod object_key;

pub use notification::NotificationError;
