//! # 即時送信ユースケース
//!
//! フォームで受け取った件名・本文・base64 の添付ファイルから 1 通のメールを組み立て、
//! 解決済み宛先へ送信する。
//!
//! 入力の検証と添付のデコードは送信前に行い、失敗した場合は何も送らない。

use std::sync::Arc;

use paperless_relay_domain::notification::{Attachment, EmailMessage, ResolvedRecipient};

use super::{MailComposer, MailKind};
use crate::error::RelayError;

/// 即時送信の入力
///
/// フォームの各項目は省略されうるため、すべて `Option` で受け取る。
#[derive(Debug, Clone, Default)]
pub struct SendEmailInput {
    /// 名目上の宛先
    pub email:               Option<String>,
    pub subject:             Option<String>,
    pub body:                Option<String>,
    pub file_name:           Option<String>,
    /// base64 エンコードされた添付ファイルの内容（パディング欠落可）
    pub file_content:        Option<String>,
    /// 上書き宛先（指定されていれば名目上の宛先より優先）
    pub hardcoded_recipient: Option<String>,
}

/// 即時送信ユースケース
pub struct DirectSendUseCase {
    composer: Arc<MailComposer>,
}

impl DirectSendUseCase {
    pub fn new(composer: Arc<MailComposer>) -> Self {
        Self { composer }
    }

    /// 添付ファイル付きメールを送信し、実際の宛先を返す
    pub async fn execute(&self, input: SendEmailInput) -> Result<ResolvedRecipient, RelayError> {
        let subject = required(input.subject, "subject")?;
        let body = required(input.body, "body")?;
        let file_name = required(input.file_name, "fileName")?;
        let file_content = required(input.file_content, "fileContent")?;

        let to = ResolvedRecipient::resolve(
            input.email.as_deref(),
            input.hardcoded_recipient.as_deref(),
        )?;
        let attachment = Attachment::from_base64(&file_name, &file_content)?;

        let email = EmailMessage {
            to,
            subject,
            text_body: body,
            attachment: Some(attachment),
        };

        self.composer.send(&email, MailKind::Direct).await?;

        Ok(email.to)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, RelayError> {
    value.ok_or_else(|| RelayError::InvalidInput(format!("{field} が指定されていません")))
}
