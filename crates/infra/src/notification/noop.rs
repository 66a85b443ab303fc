//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! SMTP 資格情報なしでローカル動作を確認する場合に使用する。

use async_trait::async_trait;
use paperless_relay_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.file_name.as_str()),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paperless_relay_domain::notification::ResolvedRecipient;

    use super::*;

    #[tokio::test]
    async fn send_emailがエラーを返さない() {
        let sender = NoopNotificationSender;
        let email = EmailMessage {
            to:         ResolvedRecipient::exact("test@example.com").unwrap(),
            subject:    "テスト件名".to_string(),
            text_body:  "テスト".to_string(),
            attachment: None,
        };

        let result = sender.send_email(&email).await;
        assert!(result.is_ok());
    }
}
