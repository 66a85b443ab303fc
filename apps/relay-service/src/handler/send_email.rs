//! # 即時送信ハンドラ
//!
//! ```text
//! POST /sendEmail
//! Content-Type: application/x-www-form-urlencoded
//!
//! email=...&subject=...&body=...&fileName=...&fileContent=<base64>&hardcodedRecipient=...
//! ```
//!
//! ブラウザの `FormData` から送られる `multipart/form-data` も同じ項目名で受け付ける。
//! multipart の場合、同名の項目が複数あれば最初の値を使い、未知の項目は読み飛ばす。

use std::sync::Arc;

use axum::{
    Form,
    Json,
    extract::{FromRequest, Multipart, Request, State, multipart::MultipartError},
    http::header,
};
use paperless_relay_shared::MessageResponse;
use serde::Deserialize;

use super::RelayState;
use crate::{error::RelayError, usecase::SendEmailInput};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// `/sendEmail` のフォーム
///
/// 欠落した項目はユースケース側で検証する。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailForm {
    pub email:               Option<String>,
    pub subject:             Option<String>,
    pub body:                Option<String>,
    pub file_name:           Option<String>,
    pub file_content:        Option<String>,
    pub hardcoded_recipient: Option<String>,
}

impl SendEmailForm {
    /// 項目名（camelCase）に対応する格納先
    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "email" => Some(&mut self.email),
            "subject" => Some(&mut self.subject),
            "body" => Some(&mut self.body),
            "fileName" => Some(&mut self.file_name),
            "fileContent" => Some(&mut self.file_content),
            "hardcodedRecipient" => Some(&mut self.hardcoded_recipient),
            _ => None,
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, RelayError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
            let Some(slot) = field.name().and_then(|name| form.slot(name)) else {
                continue;
            };
            let value = field.text().await.map_err(invalid_multipart)?;
            slot.get_or_insert(value);
        }

        Ok(form)
    }
}

fn invalid_multipart(e: MultipartError) -> RelayError {
    RelayError::InvalidInput(e.body_text())
}

/// Content-Type に応じて urlencoded と multipart を振り分ける
impl<S> FromRequest<S> for SendEmailForm
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with(MULTIPART_FORM_DATA)
            });

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| RelayError::InvalidInput(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(form) = Form::<Self>::from_request(req, state)
                .await
                .map_err(|e| RelayError::InvalidInput(e.body_text()))?;
            Ok(form)
        }
    }
}

impl From<SendEmailForm> for SendEmailInput {
    fn from(form: SendEmailForm) -> Self {
        Self {
            email:               form.email,
            subject:             form.subject,
            body:                form.body,
            file_name:           form.file_name,
            file_content:        form.file_content,
            hardcoded_recipient: form.hardcoded_recipient,
        }
    }
}

/// 添付ファイル付きメールを即時送信する
#[tracing::instrument(skip_all)]
pub async fn send_email(
    State(state): State<Arc<RelayState>>,
    form: SendEmailForm,
) -> Result<Json<MessageResponse>, RelayError> {
    let to = state.direct_send.execute(form.into()).await?;
    tracing::debug!(recipient = %to, "即時送信が完了しました");

    Ok(Json(MessageResponse::new("Email sent successfully!")))
}
