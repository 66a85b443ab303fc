//! # メール送信
//!
//! 組み立て済みの [`EmailMessage`] を [`NotificationSender`] に渡し、
//! 結果をビジネスイベントとして記録する。
//!
//! 送信は 1 回だけ試みる。失敗時のリトライは行わず、エラーを呼び出し元に返す。

use std::sync::Arc;

use paperless_relay_domain::notification::{EmailMessage, NotificationError};
use paperless_relay_infra::notification::NotificationSender;
use paperless_relay_shared::{event_log::event, log_business_event};
use strum::IntoStaticStr;

/// 送信するメールの種類（ログのラベル）
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MailKind {
    /// `/sendEmail` による即時送信
    Direct,
    /// バケット走査で一致したオブジェクトの送信
    ScheduledDocument,
    /// ウェルカムメール
    Welcome,
}

/// メール送信の窓口
pub struct MailComposer {
    sender: Arc<dyn NotificationSender>,
}

impl MailComposer {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }

    /// メールを送信する
    pub async fn send(&self, email: &EmailMessage, kind: MailKind) -> Result<(), NotificationError> {
        let kind_str: &'static str = kind.into();
        let has_attachment = email.attachment.is_some();

        match self.sender.send_email(email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.kind = kind_str,
                    notification.recipient = %email.to,
                    notification.has_attachment = has_attachment,
                    "メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.kind = kind_str,
                    notification.recipient = %email.to,
                    notification.has_attachment = has_attachment,
                    error = %e,
                    "メール送信失敗"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use paperless_relay_domain::notification::ResolvedRecipient;
    use paperless_relay_infra::mock::{FailingNotificationSender, MockNotificationSender};
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_email() -> EmailMessage {
        EmailMessage {
            to:         ResolvedRecipient::exact("alice@x.com").unwrap(),
            subject:    "件名".to_string(),
            text_body:  "本文".to_string(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_送信成功時にsenderへ渡す() {
        let sender = MockNotificationSender::new();
        let composer = MailComposer::new(Arc::new(sender.clone()));

        composer.send(&make_email(), MailKind::Direct).await.unwrap();

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "件名");
    }

    #[tokio::test]
    async fn test_送信失敗はそのまま呼び出し元に返す() {
        let sender = FailingNotificationSender::new("535 authentication failed");
        let composer = MailComposer::new(Arc::new(sender.clone()));

        let err = composer
            .send(&make_email(), MailKind::Welcome)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("535 authentication failed"));
        assert_eq!(sender.attempts().len(), 1);
    }

    #[test]
    fn test_種類のラベルはsnake_case() {
        let label: &'static str = MailKind::ScheduledDocument.into();

        assert_eq!(label, "scheduled_document");
    }
}
