//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`EmailMessage`] | 通知対象（宛先・件名・本文・添付） |
//! | [`Attachment`] | 添付ファイル（ファイル名 + デコード済みバイト列） |
//! | [`ResolvedRecipient`] | 解決済み宛先（実際に配送する唯一のアドレス） |
//!
//! ## 宛先解決ルール
//!
//! 送信リクエストは「名目上の宛先」と「上書き宛先」の 2 つを持ちうる。
//! 実際の配送先は [`ResolvedRecipient::resolve`] で一意に決める:
//!
//! 1. 上書き宛先が空でなければそれを使う
//! 2. そうでなければ名目上の宛先を使う
//! 3. どちらも空ならエラー

use derive_more::Display;
use thiserror::Error;

use crate::encoding;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 添付ファイルが不正（内容なし、デコード不可など）
    #[error("添付ファイルが不正: {0}")]
    InvalidAttachment(String),

    /// 宛先を決定できない
    #[error("宛先が不正: {0}")]
    InvalidRecipient(String),
}

/// 解決済み宛先
///
/// メールの `To` ヘッダーと SMTP の RCPT TO の両方に使う。
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct ResolvedRecipient(String);

impl ResolvedRecipient {
    /// 名目上の宛先と上書き宛先から配送先を解決する
    pub fn resolve(
        nominal: Option<&str>,
        override_address: Option<&str>,
    ) -> Result<Self, NotificationError> {
        let pick = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(str::to_string)
        };

        pick(override_address)
            .or_else(|| pick(nominal))
            .map(Self)
            .ok_or_else(|| NotificationError::InvalidRecipient("宛先が指定されていません".to_string()))
    }

    /// 単一のアドレスをそのまま宛先とする
    ///
    /// バケット走査のように、名目上の宛先と上書き宛先が同じ場合に使う。
    pub fn exact(address: &str) -> Result<Self, NotificationError> {
        Self::resolve(Some(address), Some(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 添付ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// 添付ファイル名（Content-Disposition の filename）
    pub file_name: String,
    /// デコード済みの内容
    pub content:   Vec<u8>,
}

impl Attachment {
    /// base64 文字列から添付ファイルを作成する
    ///
    /// ファイル名が空、または内容がない・デコードできない場合は送信前にエラーにする。
    pub fn from_base64(file_name: &str, encoded: &str) -> Result<Self, NotificationError> {
        Self::from_bytes(file_name, encoding::decode_attachment(encoded)?)
    }

    /// デコード済みのバイト列から添付ファイルを作成する
    ///
    /// バケットからダウンロードした内容など、転送エンコーディングを経ない場合に使う。
    pub fn from_bytes(file_name: &str, content: Vec<u8>) -> Result<Self, NotificationError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(NotificationError::InvalidAttachment(
                "添付ファイル名がありません".to_string(),
            ));
        }
        if content.is_empty() {
            return Err(NotificationError::InvalidAttachment(
                "添付ファイルの内容がありません".to_string(),
            ));
        }

        Ok(Self {
            file_name: file_name.to_string(),
            content,
        })
    }
}

/// メールメッセージ
///
/// NotificationSender に渡される送信単位。リクエストごと・一致オブジェクトごとに作られ、
/// 送信試行の後に破棄される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先
    pub to:         ResolvedRecipient,
    /// 件名
    pub subject:    String,
    /// プレーンテキスト本文
    pub text_body:  String,
    /// 添付ファイル（最大 1 件）
    pub attachment: Option<Attachment>,
}
