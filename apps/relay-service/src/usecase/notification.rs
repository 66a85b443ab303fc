//! # 通知
//!
//! メール送信をユースケースから使うための部品。
//!
//! ## モジュール構成
//!
//! - [`composer`] - `NotificationSender` への送信 + ビジネスイベントログ
//! - [`template_renderer`] - tera テンプレートエンジンによる件名・本文の生成

pub mod composer;
pub mod template_renderer;

pub use composer::{MailComposer, MailKind};
pub use template_renderer::{RenderedMail, TemplateRenderer};
