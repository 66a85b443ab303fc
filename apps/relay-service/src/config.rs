//! # Relay Service 設定
//!
//! 環境変数から Relay Service の設定を読み込む。
//!
//! 起動時に一度だけ読み込み、以降は不変の [`RelayConfig`] として扱う。
//! 必須値の欠落や解釈できない値は [`ConfigError`] として返し、
//! どの環境変数が原因かをメッセージに含める。
//!
//! 認証情報（SMTP パスワード、ストレージのアクセスキー）はすべて
//! 環境変数から注入し、コードやリポジトリ内のファイルには持たない。

use std::{env, fmt::Display, str::FromStr};

use paperless_relay_infra::{
    notification::SmtpSettings,
    object_store::{DEFAULT_REGION, StaticCredentials, StorageClientConfig},
};
use strum::{EnumString, IntoStaticStr};
use thiserror::Error;

use crate::scheduler::DailySchedule;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_SMTP_HOST: &str = "smtp.zoho.com";
const DEFAULT_SMTP_PORT: &str = "465";
const DEFAULT_NOTIFICATION_BACKEND: &str = "smtp";
const DEFAULT_SCAN_VERSION_TAG: &str = "v2";
const DEFAULT_SCAN_CATEGORIES: &str = "repairs,installations";
const DEFAULT_SCAN_SCHEDULE: &str = "09:00";
const DEFAULT_SCAN_SCHEDULE_ENABLED: &str = "true";

/// リクエストボディの既定の上限（25 MiB）
///
/// base64 の添付ファイルはフォーム内にそのまま入るため、
/// axum の既定値（2 MB）では数 MB の PDF を受け付けられない。
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 25 * 1024 * 1024;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("環境変数 {name} が設定されていません")]
    Missing { name: &'static str },

    /// 環境変数の値を解釈できない
    #[error("環境変数 {name} の値が不正です（{value}）: {reason}")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// Relay Service の設定
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// バインドアドレス
    pub host:              String,
    /// ポート番号
    pub port:              u16,
    /// リクエストボディの上限（バイト）
    pub max_request_bytes: usize,
    /// 通知設定
    pub notification:      NotificationConfig,
    /// オブジェクトストレージ設定
    pub storage:           StorageConfig,
    /// バケット走査設定
    pub scan:              ScanConfig,
}

/// 送信バックエンド
///
/// - `smtp`: SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NotificationBackend {
    Smtp,
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend: NotificationBackend,
    /// SMTP 接続設定（backend=smtp の場合のみ）
    pub smtp:    Option<SmtpSettings>,
}

/// オブジェクトストレージの設定
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 走査対象のバケット名
    pub bucket: String,
    /// クライアント接続設定
    pub client: StorageClientConfig,
}

/// バケット走査の設定
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// キーの第 1 セグメントに要求するバージョンタグ
    pub version_tag:      String,
    /// 許可するカテゴリ（キーの第 3 セグメント）
    pub categories:       Vec<String>,
    /// 定期走査の実行時刻（ローカル時刻）
    pub schedule:         DailySchedule,
    /// 定期走査を有効にするか
    pub schedule_enabled: bool,
}

impl RelayConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// プロセスの環境変数を汚さずにテストするために使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = EnvSource { lookup: &lookup };

        Ok(Self {
            host:              source.or_default("RELAY_HOST", DEFAULT_HOST),
            port:              source.parsed("PORT", DEFAULT_PORT)?,
            max_request_bytes: load_max_request_bytes(&source)?,
            notification:      NotificationConfig::load(&source)?,
            storage:           StorageConfig::load(&source)?,
            scan:              ScanConfig::load(&source)?,
        })
    }
}

fn load_max_request_bytes(source: &EnvSource<'_>) -> Result<usize, ConfigError> {
    const NAME: &str = "MAX_REQUEST_BYTES";

    let Some(value) = source.optional(NAME) else {
        return Ok(DEFAULT_MAX_REQUEST_BYTES);
    };
    match source.parse_value::<usize>(NAME, value)? {
        0 => Err(ConfigError::Invalid {
            name:   NAME,
            value:  "0".to_string(),
            reason: "1 以上を指定してください".to_string(),
        }),
        bytes => Ok(bytes),
    }
}

impl NotificationConfig {
    fn load(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let backend: NotificationBackend =
            source.parsed("NOTIFICATION_BACKEND", DEFAULT_NOTIFICATION_BACKEND)?;

        let smtp = match backend {
            NotificationBackend::Smtp => {
                let from_address = source.required("MAIL_FROM")?;
                Some(SmtpSettings {
                    host: source.or_default("SMTP_HOST", DEFAULT_SMTP_HOST),
                    port: source.parsed("SMTP_PORT", DEFAULT_SMTP_PORT)?,
                    username: source
                        .optional("SMTP_USERNAME")
                        .unwrap_or_else(|| from_address.clone()),
                    password: source.required("SMTP_PASSWORD")?,
                    from_address,
                })
            }
            NotificationBackend::Noop => None,
        };

        Ok(Self { backend, smtp })
    }
}

impl StorageConfig {
    fn load(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let access_key_id = source.optional("STORAGE_ACCESS_KEY_ID");
        let secret_access_key = source.optional("STORAGE_SECRET_ACCESS_KEY");

        // アクセスキーは両方指定するか、両方省略する
        let credentials = match (access_key_id, secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    name: "STORAGE_SECRET_ACCESS_KEY",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing {
                    name: "STORAGE_ACCESS_KEY_ID",
                });
            }
        };

        Ok(Self {
            bucket: source.required("STORAGE_BUCKET")?,
            client: StorageClientConfig {
                endpoint_url: source.optional("STORAGE_ENDPOINT_URL"),
                region: source.or_default("STORAGE_REGION", DEFAULT_REGION),
                credentials,
            },
        })
    }
}

impl ScanConfig {
    fn load(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let raw_categories = source.or_default("SCAN_CATEGORIES", DEFAULT_SCAN_CATEGORIES);
        let categories: Vec<String> = raw_categories
            .split(',')
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect();

        if categories.is_empty() {
            return Err(ConfigError::Invalid {
                name:   "SCAN_CATEGORIES",
                value:  raw_categories,
                reason: "カテゴリが 1 つも指定されていません".to_string(),
            });
        }

        Ok(Self {
            version_tag: source.or_default("SCAN_VERSION_TAG", DEFAULT_SCAN_VERSION_TAG),
            categories,
            schedule: source.parsed("SCAN_SCHEDULE", DEFAULT_SCAN_SCHEDULE)?,
            schedule_enabled: source.parsed("SCAN_SCHEDULE_ENABLED", DEFAULT_SCAN_SCHEDULE_ENABLED)?,
        })
    }
}

/// 環境変数の参照元
///
/// 空文字列（前後の空白のみを含む）は未設定として扱う。
struct EnvSource<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl EnvSource<'_> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing { name })
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, name: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_value(name, self.or_default(name, default))
    }

    fn parse_value<T>(&self, name: &'static str, value: String) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        })
    }
}
