//! # バケット走査ユースケース
//!
//! バケット内の全オブジェクトを列挙し、キーが当日の送信対象を表すものを
//! キーに埋め込まれた宛先へ添付ファイルとして送る。
//!
//! ## 走査の流れ
//!
//! 1. 全オブジェクトのキーを一覧取得する（ページングはストア側で吸収）
//! 2. 各キーを [`MatchPolicy`] で判定し、対象外はスキップ理由をログに出す
//! 3. 一致したオブジェクトごとに内容をダウンロードし、メールを 1 通送る
//!
//! ## 失敗時の扱い
//!
//! - 一覧取得・ダウンロードの失敗: 走査全体を中断してエラーを返す
//! - メールの組み立て・送信の失敗: ログに出して次のオブジェクトへ進む
//!   （宛先は送信を試みた一覧に含める）
//!
//! 送信済みの記録は持たないため、同じ日に再走査すると同じオブジェクトを再送する。

use std::sync::Arc;

use paperless_relay_domain::{
    clock::Clock,
    encoding,
    notification::{Attachment, EmailMessage, NotificationError, ResolvedRecipient},
    object_key::{DateToken, MatchPolicy, ScheduledObject},
};
use paperless_relay_infra::ObjectStore;
use paperless_relay_shared::{event_log::event, log_business_event};

use super::{MailComposer, MailKind, TemplateRenderer};
use crate::error::RelayError;

/// 走査結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// 送信を試みた宛先（走査順、重複あり）
    pub emails_sent: Vec<String>,
    /// 当日分と判定されたオブジェクト数
    pub matched:     usize,
    /// 対象外としてスキップしたオブジェクト数
    pub skipped:     usize,
    /// 組み立て・送信に失敗したオブジェクト数
    pub failed:      usize,
}

/// バケット走査ユースケース
pub struct BucketScanUseCase {
    store:    Arc<dyn ObjectStore>,
    composer: Arc<MailComposer>,
    renderer: Arc<TemplateRenderer>,
    clock:    Arc<dyn Clock>,
    policy:   MatchPolicy,
}

impl BucketScanUseCase {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        composer: Arc<MailComposer>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            store,
            composer,
            renderer,
            clock,
            policy,
        }
    }

    /// バケットを走査し、当日分のオブジェクトを送信する
    #[tracing::instrument(skip_all, fields(date))]
    pub async fn scan_and_notify(&self) -> Result<ScanOutcome, RelayError> {
        let today = DateToken::for_date(self.clock.today());
        tracing::Span::current().record("date", today.as_str());

        let objects = self.store.list_objects().await?;
        let mut outcome = ScanOutcome::default();

        for object in objects {
            let scheduled = match self.policy.evaluate(&object.key, &today) {
                Ok(scheduled) => scheduled,
                Err(reason) => {
                    let reason_code: &'static str = (&reason).into();
                    log_business_event!(
                        event.category = event::category::SCAN,
                        event.action = event::action::OBJECT_SKIPPED,
                        event.result = event::result::SKIPPED,
                        scan.key = %object.key,
                        scan.skip_reason = reason_code,
                        "対象外のオブジェクトをスキップ: {}",
                        reason
                    );
                    outcome.skipped += 1;
                    continue;
                }
            };
            outcome.matched += 1;

            let content = self.store.get_object(&scheduled.key).await?;

            if let Err(e) = self.notify(&scheduled, &content).await {
                tracing::warn!(
                    key = %scheduled.key,
                    recipient = %scheduled.recipient,
                    error = %e,
                    "オブジェクトの送信に失敗したため次へ進みます"
                );
                outcome.failed += 1;
            }
            outcome.emails_sent.push(scheduled.recipient);
        }

        let result = if outcome.failed == 0 {
            event::result::SUCCESS
        } else {
            event::result::FAILURE
        };
        log_business_event!(
            event.category = event::category::SCAN,
            event.action = event::action::SCAN_COMPLETED,
            event.result = result,
            scan.matched = outcome.matched,
            scan.skipped = outcome.skipped,
            scan.failed = outcome.failed,
            "バケット走査完了"
        );

        Ok(outcome)
    }

    /// 一致したオブジェクト 1 件分のメールを組み立てて送る
    ///
    /// 添付は即時送信と同じく base64 を経由して組み立てる。
    async fn notify(
        &self,
        object: &ScheduledObject,
        content: &[u8],
    ) -> Result<(), NotificationError> {
        let encoded = encoding::encode_attachment(content);
        let attachment = Attachment::from_base64(&object.file_name, &encoded)?;
        let rendered = self.renderer.render_scheduled_document(object)?;

        let email = EmailMessage {
            to:         ResolvedRecipient::exact(&object.recipient)?,
            subject:    rendered.subject,
            text_body:  rendered.text_body,
            attachment: Some(attachment),
        };

        self.composer.send(&email, MailKind::ScheduledDocument).await
    }
}
