//! # ウェルカムメールハンドラ
//!
//! ```text
//! POST /sendWelcomeEmail
//! Content-Type: application/json
//!
//! { "email": "...", "temporary_password": "...", "companyName": "..." }
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use paperless_relay_shared::MessageResponse;
use serde::Deserialize;

use super::RelayState;
use crate::{error::RelayError, usecase::WelcomeInput};

/// `/sendWelcomeEmail` のリクエストボディ
///
/// 既存クライアントに合わせ、会社名だけ camelCase で受け取る。
#[derive(Debug, Deserialize)]
pub struct WelcomeRequest {
    pub email:              String,
    pub temporary_password: String,
    #[serde(rename = "companyName")]
    pub company_name:       String,
}

/// ウェルカムメールを送信する
#[tracing::instrument(skip_all)]
pub async fn send_welcome_email(
    State(state): State<Arc<RelayState>>,
    request: Result<Json<WelcomeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, RelayError> {
    let Json(request) = request.map_err(|e| RelayError::InvalidInput(e.body_text()))?;

    state
        .welcome
        .execute(WelcomeInput {
            email:              request.email,
            temporary_password: request.temporary_password,
            company_name:       request.company_name,
        })
        .await?;

    Ok(Json(MessageResponse::new("Welcome email sent successfully!")))
}
