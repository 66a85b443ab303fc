//! # テスト用モック
//!
//! ユースケーステストとルーターテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! paperless-relay-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use paperless_relay_domain::notification::{EmailMessage, NotificationError};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    object_store::{ObjectStore, StoredObject},
};

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信されたメールの一覧（送信順）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== FailingNotificationSender =====

/// 常に送信失敗を返すモック（SMTP 認証失敗などの再現用）
///
/// 失敗させた試行も記録するため、走査が送信失敗後も継続したかを検証できる。
#[derive(Clone)]
pub struct FailingNotificationSender {
    reason:   String,
    attempts: Arc<Mutex<Vec<EmailMessage>>>,
}

impl FailingNotificationSender {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason:   reason.into(),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 送信を試みたメールの一覧
    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for FailingNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.attempts.lock().unwrap().push(email.clone());
        Err(NotificationError::SendFailed(self.reason.clone()))
    }
}

// ===== MockObjectStore =====

/// インメモリのオブジェクトストア
///
/// キーの辞書順で列挙する（S3 の ListObjectsV2 と同じ順序）。
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects:      Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    list_failure: Arc<Mutex<Option<String>>>,
    downloads:    Arc<Mutex<Vec<String>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// オブジェクトを追加する
    pub fn put(&self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.into(), content.into());
    }

    /// 以降の一覧取得を失敗させる（バケット到達不能の再現用）
    pub fn fail_listing(&self, reason: impl Into<String>) {
        *self.list_failure.lock().unwrap() = Some(reason.into());
    }

    /// ダウンロードされたキーの一覧（呼び出し順）
    pub fn downloaded_keys(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn list_objects(&self) -> Result<Vec<StoredObject>, InfraError> {
        if let Some(reason) = self.list_failure.lock().unwrap().as_ref() {
            return Err(InfraError::object_storage(reason.clone()));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .map(|key| StoredObject { key: key.clone() })
            .collect())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, InfraError> {
        self.downloads.lock().unwrap().push(key.to_string());

        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| InfraError::object_storage(format!("オブジェクトが存在しません: {key}")))
    }
}
