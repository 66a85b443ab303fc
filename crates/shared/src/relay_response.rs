//! # リレー API のレスポンス形式
//!
//! 既存クライアントとの互換性のため、エンベロープ（`{ "data": T }`）を使わず
//! フラットな JSON を返す:
//!
//! - 成功: `{ "message": "..." }`
//! - 走査成功: `{ "message": "...", "emails_sent": [...] }`
//! - 失敗: `{ "error": "..." }`
//!
//! axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）。

use serde::{Deserialize, Serialize};

/// 成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// バケット走査の成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub message:     String,
    /// 送信を試みた宛先（走査順）
    pub emails_sent: Vec<String>,
}

/// エラーレスポンス
///
/// 構造化エラーコードは持たず、原因を表す 1 つの文字列だけを返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
