//! # バケット走査ハンドラ
//!
//! ```text
//! GET /checkFilesAndSendEmails
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use paperless_relay_shared::ScanResponse;

use super::RelayState;
use crate::error::RelayError;

/// バケットを走査し、当日分のオブジェクトを送信する
///
/// 定期スケジューラと同じユースケースを呼ぶ。
#[tracing::instrument(skip_all)]
pub async fn check_files_and_send_emails(
    State(state): State<Arc<RelayState>>,
) -> Result<Json<ScanResponse>, RelayError> {
    let outcome = state.scan.scan_and_notify().await?;

    Ok(Json(ScanResponse {
        message:     "Emails sent successfully!".to_string(),
        emails_sent: outcome.emails_sent,
    }))
}
