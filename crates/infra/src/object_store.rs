//! # オブジェクトストレージ接続管理
//!
//! S3 互換のオブジェクトストレージからキーの一覧とオブジェクト本体を取得する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: このサービスはキー（名前）と内容を読むだけで、書き戻しは行わない
//! - **カスタムエンドポイント**: `STORAGE_ENDPOINT_URL` 指定時は MinIO や
//!   S3 互換 API（GCS の XML API など）に接続する
//! - **認証**: 明示的なアクセスキーが設定されていればそれを使い、
//!   なければ SDK のデフォルト認証チェーンで解決する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use paperless_relay_infra::object_store::{self, AwsObjectStore, StorageClientConfig};
//!
//! async fn setup() {
//!     let config = StorageClientConfig {
//!         endpoint_url: Some("http://localhost:19000".to_string()),
//!         ..StorageClientConfig::default()
//!     };
//!     let client = object_store::create_client(&config).await;
//!     let store = AwsObjectStore::new(client, "relay-documents".to_string());
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use aws_sdk_s3::{Client, error::DisplayErrorContext};

use crate::InfraError;

/// 既定のリージョン
pub const DEFAULT_REGION: &str = "us-east-1";

/// 認証情報のプロバイダ名（SDK のログに出る）
const CREDENTIALS_PROVIDER_NAME: &str = "paperless-relay";

/// バケット内のオブジェクト（メタデータのみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// オブジェクトキー
    pub key: String,
}

/// オブジェクトストレージのインターフェース
///
/// テスト時はモックに差し替え可能。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// バケット内の全オブジェクトを列挙する
    ///
    /// ページングは実装側で吸収し、全ページ分をまとめて返す。
    async fn list_objects(&self) -> Result<Vec<StoredObject>, InfraError>;

    /// オブジェクトの内容をすべてダウンロードする
    ///
    /// # 引数
    ///
    /// * `key` - オブジェクトキー（例: `v2/alice@x.com/repairs/24-07-01_order.pdf`）
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, InfraError>;
}

/// AWS S3 オブジェクトストア
///
/// `aws-sdk-s3` を使用した [`ObjectStore`] の実装。
/// MinIO とも互換動作する。
pub struct AwsObjectStore {
    client:      Client,
    bucket_name: String,
}

impl AwsObjectStore {
    pub fn new(client: Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
        }
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    #[tracing::instrument(skip_all, fields(bucket = %self.bucket_name))]
    async fn list_objects(&self) -> Result<Vec<StoredObject>, InfraError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                InfraError::object_storage(format!(
                    "オブジェクト一覧の取得に失敗: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

            objects.extend(page.contents().iter().filter_map(|object| {
                object.key().map(|key| StoredObject {
                    key: key.to_string(),
                })
            }));
        }

        tracing::debug!(count = objects.len(), "オブジェクト一覧を取得しました");
        Ok(objects)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket_name))]
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, InfraError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                InfraError::object_storage(format!(
                    "オブジェクトの取得に失敗: {key}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let bytes = output.body.collect().await.map_err(|e| {
            InfraError::object_storage(format!("オブジェクト本体の読み込みに失敗: {key}: {e}"))
        })?;

        Ok(bytes.into_bytes().to_vec())
    }
}

/// 明示的なアクセスキー
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id:     String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"********")
            .finish()
    }
}

/// ストレージクライアントの接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageClientConfig {
    /// カスタムエンドポイント URL（例: `http://localhost:19000`）
    pub endpoint_url: Option<String>,
    /// リージョン
    pub region:       String,
    /// 明示的なアクセスキー（`None` なら SDK のデフォルト認証チェーン）
    pub credentials:  Option<StaticCredentials>,
}

impl Default for StorageClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region:       DEFAULT_REGION.to_string(),
            credentials:  None,
        }
    }
}

/// S3 クライアントを作成する
///
/// `endpoint_url` が `Some` の場合はカスタムエンドポイントにパススタイルで接続する。
pub async fn create_client(config: &StorageClientConfig) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    if let Some(credentials) = &config.credentials {
        loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }

    let sdk_config = loader.load().await;

    // MinIO 等はパススタイルが必要（バーチャルホスト型 URL を使わない）
    let s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);
    let s3_config = if config.endpoint_url.is_some() {
        s3_config_builder.force_path_style(true).build()
    } else {
        s3_config_builder.build()
    };

    Client::from_conf(s3_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AwsObjectStore>();
    }

    #[test]
    fn 既定の接続設定はus_east_1でデフォルト認証チェーンを使う() {
        let config = StorageClientConfig::default();

        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint_url.is_none());
        assert!(config.credentials.is_none());
    }

    #[test]
    fn debug出力にシークレットキーを含めない() {
        let credentials = StaticCredentials {
            access_key_id:     "AKIAEXAMPLE".to_string(),
            secret_access_key: "very-secret".to_string(),
        };

        let debug = format!("{credentials:?}");

        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("very-secret"));
    }

    #[tokio::test]
    async fn カスタムエンドポイントでクライアントを作成できる() {
        let config = StorageClientConfig {
            endpoint_url: Some("http://localhost:19000".to_string()),
            region:       "ap-northeast-1".to_string(),
            credentials:  Some(StaticCredentials {
                access_key_id:     "local".to_string(),
                secret_access_key: "local".to_string(),
            }),
        };

        let client = create_client(&config).await;

        assert_eq!(
            client.config().region().map(ToString::to_string),
            Some("ap-northeast-1".to_string())
        );
    }
}
