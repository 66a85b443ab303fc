//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 送信サーバーには暗黙的 TLS（SMTPS、既定ポート 465）で接続し、
//! 設定から注入されたユーザー名・パスワードで認証する。
//!
//! lettre の `pool` feature を有効にしていないため、接続は送信ごとに開いて閉じる。

use std::fmt;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{
        Attachment as MimeAttachment,
        Mailbox,
        Message,
        MultiPart,
        SinglePart,
        header::ContentType,
    },
    transport::smtp::authentication::Credentials,
};
use paperless_relay_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// 添付ファイルの Content-Type（種別を問わず汎用バイナリとして送る）
const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// SMTP 接続設定
#[derive(Clone)]
pub struct SmtpSettings {
    /// 送信サーバーのホスト名（例: "smtp.zoho.com"）
    pub host:         String,
    /// 送信サーバーのポート番号（暗黙的 TLS: 465）
    pub port:         u16,
    /// SMTP 認証ユーザー名
    pub username:     String,
    /// SMTP 認証パスワード
    pub password:     String,
    /// 送信元メールアドレス
    pub from_address: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 送信元アドレスの形式と TLS 設定をここで検証する（接続はまだ行わない）。
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let from_address = settings
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 接続設定の構築に失敗: {e}")))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            from_address,
        })
    }
}

/// 送信用の MIME メッセージを組み立てる
///
/// 添付ファイルがある場合は `multipart/mixed`（本文 + `application/octet-stream`）、
/// ない場合は `text/plain` 単体になる。
pub fn build_message(from: &Mailbox, email: &EmailMessage) -> Result<Message, NotificationError> {
    let to = email
        .to
        .as_str()
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?;

    let builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str());

    let text_part = SinglePart::builder()
        .header(ContentType::TEXT_PLAIN)
        .body(email.text_body.clone());

    let message = match &email.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
                .map_err(|e| NotificationError::SendFailed(format!("Content-Type 不正: {e}")))?;
            let attachment_part = MimeAttachment::new(attachment.file_name.clone())
                .body(attachment.content.clone(), content_type);

            builder.multipart(
                MultiPart::mixed()
                    .singlepart(text_part)
                    .singlepart(attachment_part),
            )
        }
        None => builder.singlepart(text_part),
    };

    message.map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(&self.from_address, email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paperless_relay_domain::notification::{Attachment, ResolvedRecipient};

    use super::*;

    fn from() -> Mailbox {
        "relay@example.com".parse().unwrap()
    }

    fn email(attachment: Option<Attachment>) -> EmailMessage {
        EmailMessage {
            to: ResolvedRecipient::exact("alice@x.com").unwrap(),
            subject: "Scheduled repairs document".to_string(),
            text_body: "本文".to_string(),
            attachment,
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[test]
    fn 添付ありのメッセージはmultipart_mixedになる() {
        let attachment = Attachment {
            file_name: "order.pdf".to_string(),
            content:   b"hello".to_vec(),
        };

        let message = build_message(&from(), &email(Some(attachment))).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("application/octet-stream"));
        assert!(formatted.contains("attachment"));
        assert!(formatted.contains("order.pdf"));
    }

    #[test]
    fn 添付なしのメッセージはtext_plain単体になる() {
        let message = build_message(&from(), &email(None)).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("text/plain"));
        assert!(!formatted.contains("multipart/mixed"));
    }

    #[test]
    fn 宛先ヘッダーは解決済み宛先になる() {
        let message = build_message(&from(), &email(None)).unwrap();
        let envelope = message.envelope();

        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "alice@x.com");
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("relay@example.com")
        );
    }

    #[test]
    fn 宛先アドレスが不正ならエラー() {
        let mut invalid = email(None);
        invalid.to = ResolvedRecipient::exact("not an address").unwrap();

        let err = build_message(&from(), &invalid).unwrap_err();

        assert!(err.to_string().contains("宛先アドレス不正"));
    }

    #[test]
    fn 送信元アドレスが不正ならnewがエラーを返す() {
        let settings = SmtpSettings {
            host:         "smtp.example.com".to_string(),
            port:         465,
            username:     "relay@example.com".to_string(),
            password:     "secret".to_string(),
            from_address: "invalid".to_string(),
        };

        let result = SmtpNotificationSender::new(settings);

        assert!(matches!(result, Err(NotificationError::SendFailed(_))));
    }

    #[test]
    fn debug出力にパスワードを含めない() {
        let settings = SmtpSettings {
            host:         "smtp.example.com".to_string(),
            port:         465,
            username:     "relay@example.com".to_string(),
            password:     "top-secret".to_string(),
            from_address: "relay@example.com".to_string(),
        };

        assert!(!format!("{settings:?}").contains("top-secret"));
    }
}
