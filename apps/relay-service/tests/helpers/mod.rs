//! ルーターテスト用のビルダー
//!
//! インメモリのオブジェクトストアと送信モックで `RelayState` を組み立て、
//! 本番と同じ `build_app` のルーターを返す。
//!
//! テストバイナリごとに使うヘルパーが異なるため、一部だけを使うバイナリで
//! 警告が出るものには個別に `allow(dead_code)` を付けている。

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::NaiveDate;
use paperless_relay_domain::{clock::FixedClock, object_key::MatchPolicy};
use paperless_relay_infra::{NotificationSender, mock::MockObjectStore};
use paperless_relay_service::{
    app_builder::build_app,
    config::DEFAULT_MAX_REQUEST_BYTES,
    handler::RelayState,
    usecase::{
        BucketScanUseCase,
        DirectSendUseCase,
        MailComposer,
        TemplateRenderer,
        WelcomeUseCase,
    },
};

/// 走査テストの「今日」（2024-07-01）
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

/// 既定のボディ上限でテスト用ルーターを構築する
pub fn build_test_app(store: MockObjectStore, sender: Arc<dyn NotificationSender>) -> Router {
    build_test_app_with_limit(store, sender, DEFAULT_MAX_REQUEST_BYTES)
}

/// ボディ上限を指定してテスト用ルーターを構築する
pub fn build_test_app_with_limit(
    store: MockObjectStore,
    sender: Arc<dyn NotificationSender>,
    max_request_bytes: usize,
) -> Router {
    let composer = Arc::new(MailComposer::new(sender));
    let renderer = Arc::new(TemplateRenderer::new().unwrap());

    let scan = Arc::new(BucketScanUseCase::new(
        Arc::new(store),
        composer.clone(),
        renderer.clone(),
        Arc::new(FixedClock::at_date(today())),
        MatchPolicy::new("v2", ["repairs", "installations"]),
    ));

    build_app(
        Arc::new(RelayState {
            direct_send: DirectSendUseCase::new(composer.clone()),
            scan,
            welcome: WelcomeUseCase::new(composer, renderer),
        }),
        max_request_bytes,
    )
}

/// urlencoded フォームのリクエストを作成する
#[allow(dead_code)]
pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// multipart/form-data のリクエストを作成する
///
/// ブラウザの `FormData` と同じく、各項目をテキストのパートとして送る。
#[allow(dead_code)]
pub fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    const BOUNDARY: &str = "relay-test-boundary-7MA4YWxkTrZu0gW";

    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// JSON リクエストを作成する
#[allow(dead_code)]
pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// GET リクエストを作成する
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// レスポンスボディを JSON として読み出す
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
