//! # ウェルカムメールユースケース
//!
//! 新規アカウントの宛先に、仮パスワードと会社名を含む固定文面のメールを送る。
//! 添付ファイルは付けない。

use std::sync::Arc;

use paperless_relay_domain::notification::{EmailMessage, ResolvedRecipient};

use super::{MailComposer, MailKind, TemplateRenderer};
use crate::error::RelayError;

/// ウェルカムメールの入力
#[derive(Debug, Clone)]
pub struct WelcomeInput {
    pub email:              String,
    pub temporary_password: String,
    pub company_name:       String,
}

/// ウェルカムメールユースケース
pub struct WelcomeUseCase {
    composer: Arc<MailComposer>,
    renderer: Arc<TemplateRenderer>,
}

impl WelcomeUseCase {
    pub fn new(composer: Arc<MailComposer>, renderer: Arc<TemplateRenderer>) -> Self {
        Self { composer, renderer }
    }

    pub async fn execute(&self, input: WelcomeInput) -> Result<(), RelayError> {
        let to = ResolvedRecipient::exact(&input.email)?;
        let rendered = self.renderer.render_welcome(
            to.as_str(),
            &input.temporary_password,
            &input.company_name,
        )?;

        let email = EmailMessage {
            to,
            subject: rendered.subject,
            text_body: rendered.text_body,
            attachment: None,
        };

        self.composer.send(&email, MailKind::Welcome).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paperless_relay_infra::mock::MockNotificationSender;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_usecase(sender: MockNotificationSender) -> WelcomeUseCase {
        WelcomeUseCase::new(
            Arc::new(MailComposer::new(Arc::new(sender))),
            Arc::new(TemplateRenderer::new().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_仮パスワードと会社名を含むメールを送信する() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(sender.clone());

        usecase
            .execute(WelcomeInput {
                email:              "a@b.com".to_string(),
                temporary_password: "p1".to_string(),
                company_name:       "Acme".to_string(),
            })
            .await
            .unwrap();

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "a@b.com");
        assert_eq!(sent[0].subject, "Welcome to Acme");
        assert!(sent[0].text_body.contains("p1"));
        assert!(sent[0].text_body.contains("Acme"));
        assert!(sent[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_宛先が空ならエラー() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(sender.clone());

        let result = usecase
            .execute(WelcomeInput {
                email:              " ".to_string(),
                temporary_password: "p1".to_string(),
                company_name:       "Acme".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert!(sender.sent_emails().is_empty());
    }
}
