//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールの件名とプレーンテキスト本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名はコードで組み立てる**: 本文のみテンプレート化する
//! - **プレーンテキストのみ**: HTML 版は持たない

use paperless_relay_domain::{notification::NotificationError, object_key::ScheduledObject};
use tera::{Context, Tera};

const SCHEDULED_DOCUMENT_TEMPLATE: &str = "scheduled_document.txt";
const WELCOME_TEMPLATE: &str = "welcome.txt";

/// レンダリング結果（件名 + 本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject:   String,
    pub text_body: String,
}

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    SCHEDULED_DOCUMENT_TEMPLATE,
                    include_str!("../../../templates/notifications/scheduled_document.txt"),
                ),
                (
                    WELCOME_TEMPLATE,
                    include_str!("../../../templates/notifications/welcome.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// バケット走査で一致したオブジェクトの通知を生成する
    ///
    /// 件名はカテゴリ、本文はキーの第 4 セグメントと一致した日付を示す。
    pub fn render_scheduled_document(
        &self,
        object: &ScheduledObject,
    ) -> Result<RenderedMail, NotificationError> {
        let mut context = Context::new();
        context.insert("category", &object.category);
        context.insert("order_token", &object.order_token);
        context.insert("file_name", &object.file_name);
        context.insert("date", object.date.as_str());

        Ok(RenderedMail {
            subject:   format!("Today's {} document: {}", object.category, object.file_name),
            text_body: self.render(SCHEDULED_DOCUMENT_TEMPLATE, &context)?,
        })
    }

    /// ウェルカムメールを生成する
    pub fn render_welcome(
        &self,
        email: &str,
        temporary_password: &str,
        company_name: &str,
    ) -> Result<RenderedMail, NotificationError> {
        let mut context = Context::new();
        context.insert("email", email);
        context.insert("temporary_password", temporary_password);
        context.insert("company_name", company_name);

        Ok(RenderedMail {
            subject:   format!("Welcome to {company_name}"),
            text_body: self.render(WELCOME_TEMPLATE, &context)?,
        })
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String, NotificationError> {
        self.engine
            .render(template_name, context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))
    }
}
