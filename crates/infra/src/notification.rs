//! # 通知送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（暗黙的 TLS の送信サーバー）、Noop（ローカル確認用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **再送しない**: 失敗は呼び出し元に返すだけで、リトライは行わない

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
use paperless_relay_domain::notification::{EmailMessage, NotificationError};
pub use smtp::{SmtpNotificationSender, SmtpSettings, build_message};

/// メール送信トレイト
///
/// 通知リレーの中核。メール送信の具体的な方法を抽象化する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    ///
    /// `Ok` は送信サーバーへの受け渡し完了を意味する（配達は保証しない）。
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
