//! # オブジェクトキーと当日照合
//!
//! バケット内のオブジェクトキーは `/` 区切りのセグメントで予定を表す:
//!
//! ```text
//! {version-tag}/{email}/{category}/{date_order_token}[/...]
//! v2/alice@x.com/repairs/24-07-01_order.pdf
//! ```
//!
//! `date_order_token` の最初の `_` より前が日付（`YY-MM-DD`）。
//!
//! ## 照合ルール
//!
//! [`MatchPolicy::evaluate`] は以下を順に確認し、最初に満たさなかった条件を
//! [`SkipReason`] として返す。スキップはエラーではなく、走査全体は継続する。
//!
//! 1. セグメントが 4 つ以上ある（末尾 `/` のディレクトリマーカーは除外）
//! 2. 1 番目のセグメントがバージョンタグに一致する
//! 3. 2 番目のセグメント（宛先）が空でない
//! 4. 3 番目のセグメントが許可カテゴリのいずれか
//! 5. 4 番目のセグメントの日付部分が今日の日付トークンに一致する

use chrono::NaiveDate;
use derive_more::Display;
use strum::IntoStaticStr;
use thiserror::Error;

/// キーのセグメント区切り
const SEGMENT_SEPARATOR: char = '/';

/// 日付部分と注文部分の区切り
const DATE_SEPARATOR: char = '_';

/// 照合に必要な最小セグメント数
const MIN_SEGMENTS: usize = 4;

/// 日付トークン（`YY-MM-DD`）
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct DateToken(String);

impl DateToken {
    /// 日付から日付トークンを作る
    pub fn for_date(date: NaiveDate) -> Self {
        Self(date.format("%y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 解析済みオブジェクトキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey<'a> {
    raw:      &'a str,
    segments: Vec<&'a str>,
}

impl<'a> ObjectKey<'a> {
    /// キーをセグメントに分解する（分解自体は失敗しない）
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            segments: raw.split(SEGMENT_SEPARATOR).collect(),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// 末尾のセグメント（添付ファイル名に使う）
    pub fn file_name(&self) -> &'a str {
        self.segments.last().copied().unwrap_or_default()
    }

    /// 末尾が `/` のディレクトリマーカーか
    pub fn is_directory_marker(&self) -> bool {
        self.raw.ends_with(SEGMENT_SEPARATOR)
    }
}

/// 照合対象外と判定された理由
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// ディレクトリマーカー
    #[error("ディレクトリマーカーのため対象外")]
    DirectoryMarker,

    /// セグメント不足
    #[error("セグメント数が不足しています: {count}")]
    TooFewSegments { count: usize },

    /// バージョンタグ不一致
    #[error("バージョンタグが一致しません: {found}")]
    VersionMismatch { found: String },

    /// 宛先セグメントが空
    #[error("宛先セグメントが空です")]
    EmptyRecipient,

    /// 許可されていないカテゴリ
    #[error("許可されていないカテゴリです: {found}")]
    CategoryNotAllowed { found: String },

    /// 日付が今日ではない
    #[error("日付が一致しません: {found}")]
    DateMismatch { found: String },
}

/// 今日送信すべきと判定されたオブジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledObject {
    /// オブジェクトキー全体
    pub key:         String,
    /// キーに埋め込まれた宛先（2 番目のセグメント）
    pub recipient:   String,
    /// 作業カテゴリ（3 番目のセグメント）
    pub category:    String,
    /// 日付・注文トークン（4 番目のセグメント）
    pub order_token: String,
    /// 添付ファイル名（末尾のセグメント）
    pub file_name:   String,
    /// 一致した日付トークン
    pub date:        DateToken,
}

/// 当日照合ポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    version_tag: String,
    categories:  Vec<String>,
}

impl MatchPolicy {
    pub fn new<I, S>(version_tag: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version_tag: version_tag.into(),
            categories:  categories.into_iter().map(Into::into).collect(),
        }
    }

    /// キーが今日の送信対象かを判定する
    pub fn evaluate(&self, raw_key: &str, today: &DateToken) -> Result<ScheduledObject, SkipReason> {
        let key = ObjectKey::parse(raw_key);

        if key.is_directory_marker() {
            return Err(SkipReason::DirectoryMarker);
        }

        if key.segment_count() < MIN_SEGMENTS {
            return Err(SkipReason::TooFewSegments {
                count: key.segment_count(),
            });
        }
        let [version, recipient, category, order_token] = [
            key.segments[0],
            key.segments[1],
            key.segments[2],
            key.segments[3],
        ];

        if version != self.version_tag {
            return Err(SkipReason::VersionMismatch {
                found: version.to_string(),
            });
        }

        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(SkipReason::EmptyRecipient);
        }

        if !self.categories.iter().any(|allowed| allowed == category) {
            return Err(SkipReason::CategoryNotAllowed {
                found: category.to_string(),
            });
        }

        let date_part = order_token
            .split(DATE_SEPARATOR)
            .next()
            .unwrap_or_default();
        if date_part != today.as_str() {
            return Err(SkipReason::DateMismatch {
                found: date_part.to_string(),
            });
        }

        Ok(ScheduledObject {
            key:         raw_key.to_string(),
            recipient:   recipient.to_string(),
            category:    category.to_string(),
            order_token: order_token.to_string(),
            file_name:   key.file_name().to_string(),
            date:        today.clone(),
        })
    }
}
