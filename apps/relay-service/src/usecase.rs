//! # ユースケース層
//!
//! HTTP ハンドラと定期スケジューラから呼ばれるアプリケーションロジック。
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信（ログ記録付き）とテンプレートレンダリング
//! - [`direct_send`] - 添付ファイル付きメールの即時送信
//! - [`scan`] - バケット走査と当日分の送信
//! - [`welcome`] - ウェルカムメールの送信

pub mod direct_send;
pub mod notification;
pub mod scan;
pub mod welcome;

pub use direct_send::{DirectSendUseCase, SendEmailInput};
pub use notification::{MailComposer, MailKind, RenderedMail, TemplateRenderer};
pub use scan::{BucketScanUseCase, ScanOutcome};
pub use welcome::{WelcomeInput, WelcomeUseCase};
