//! # Paperless Relay Service サーバー
//!
//! 添付ファイル付きメールの送信 API と、バケット走査による定期送信を提供する。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 説明 |
//! |---------|------|------|
//! | GET | `/health` | ヘルスチェック |
//! | POST | `/sendEmail` | 添付ファイル付きメールの即時送信（urlencoded / multipart フォーム） |
//! | GET | `/checkFilesAndSendEmails` | バケット走査と当日分の送信 |
//! | POST | `/sendWelcomeEmail` | ウェルカムメールの送信（JSON） |
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `RELAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `MAX_REQUEST_BYTES` | No | リクエストボディの上限（デフォルト: 25 MiB） |
//! | `NOTIFICATION_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `MAIL_FROM` | smtp 時 | 送信元メールアドレス |
//! | `SMTP_PASSWORD` | smtp 時 | SMTP 認証パスワード |
//! | `STORAGE_BUCKET` | **Yes** | 走査対象のバケット名 |
//! | `SCAN_SCHEDULE` | No | 定期走査の時刻 `HH:MM`（デフォルト: `09:00`） |
//!
//! その他の項目は [`paperless_relay_service::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! MAIL_FROM=relay@example.com SMTP_PASSWORD=... STORAGE_BUCKET=relay-documents \
//!   cargo run -p paperless-relay-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use paperless_relay_domain::{
    clock::{Clock, SystemClock},
    object_key::MatchPolicy,
};
use paperless_relay_infra::{
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    object_store::{self, AwsObjectStore},
};
use paperless_relay_service::{
    app_builder::build_app,
    config::{NotificationBackend, NotificationConfig, RelayConfig},
    handler::RelayState,
    scheduler,
    usecase::{
        BucketScanUseCase,
        DirectSendUseCase,
        MailComposer,
        TemplateRenderer,
        WelcomeUseCase,
    },
};
use paperless_relay_shared::observability::{self, TracingConfig};
use tokio::net::TcpListener;

/// Relay Service のエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("relay-service");
    observability::init_tracing(&tracing_config);
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    // 設定読み込み
    let config = RelayConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Relay Service を起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let sender = create_sender(&config.notification)?;
    let composer = Arc::new(MailComposer::new(sender));
    let renderer = Arc::new(TemplateRenderer::new()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let storage_client = object_store::create_client(&config.storage.client).await;
    let store = Arc::new(AwsObjectStore::new(
        storage_client,
        config.storage.bucket.clone(),
    ));
    tracing::info!(bucket = %config.storage.bucket, "オブジェクトストレージを設定しました");

    let scan_usecase = Arc::new(BucketScanUseCase::new(
        store,
        composer.clone(),
        renderer.clone(),
        clock.clone(),
        MatchPolicy::new(
            config.scan.version_tag.clone(),
            config.scan.categories.iter().cloned(),
        ),
    ));

    let state = Arc::new(RelayState {
        direct_send: DirectSendUseCase::new(composer.clone()),
        scan:        scan_usecase.clone(),
        welcome:     WelcomeUseCase::new(composer, renderer),
    });

    // 定期走査
    if config.scan.schedule_enabled {
        tracing::info!(schedule = %config.scan.schedule, "定期バケット走査を有効化しました");
        scheduler::spawn_daily_scan(scan_usecase, config.scan.schedule, clock);
    } else {
        tracing::info!("定期バケット走査は無効です");
    }

    // ルーター構築
    let app = build_app(state, config.max_request_bytes);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("アドレスのパースに失敗しました: {}:{}", config.host, config.port))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Relay Service が起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 通知バックエンドに応じた送信実装を作成する
fn create_sender(config: &NotificationConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    let backend: &'static str = config.backend.into();

    let sender: Arc<dyn NotificationSender> = match (config.backend, &config.smtp) {
        (NotificationBackend::Smtp, Some(settings)) => {
            tracing::info!(
                backend,
                host = %settings.host,
                port = settings.port,
                "SMTP で送信します"
            );
            Arc::new(SmtpNotificationSender::new(settings.clone())?)
        }
        (NotificationBackend::Smtp, None) => {
            anyhow::bail!("SMTP バックエンドの接続設定がありません");
        }
        (NotificationBackend::Noop, _) => {
            tracing::warn!(backend, "メールは送信されません（ログ出力のみ）");
            Arc::new(NoopNotificationSender)
        }
    };

    Ok(sender)
}
