//! # Relay Service エラー定義
//!
//! Relay Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! 既存クライアントとの互換性のため、エラーはすべて HTTP 500 と
//! `{ "error": <原因> }` で返す。入力不備も 4xx には分けない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use paperless_relay_domain::notification::NotificationError;
use paperless_relay_infra::InfraError;
use paperless_relay_shared::ErrorBody;
use thiserror::Error;

/// Relay Service で発生するエラー
#[derive(Debug, Error)]
pub enum RelayError {
    /// リクエストの内容が不正（必須項目の欠落、JSON の構文エラーなど）
    #[error("不正なリクエスト: {0}")]
    InvalidInput(String),

    /// メールの組み立て・送信に失敗
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// オブジェクトストレージとの通信に失敗
    #[error("{0}")]
    Infra(#[from] InfraError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Infra(e) => {
                tracing::error!(
                    error.kind = "infrastructure",
                    span_trace = %e.span_trace(),
                    "インフラエラー: {}",
                    e
                );
            }
            RelayError::InvalidInput(msg) => {
                tracing::error!(error.kind = "invalid_input", "不正なリクエスト: {}", msg);
            }
            RelayError::Notification(e) => {
                tracing::error!(error.kind = "notification", "メール送信に失敗: {}", e);
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}
