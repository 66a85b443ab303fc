//! # Relay Service アプリケーション構築
//!
//! ルーター構築とミドルウェアの適用を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use paperless_relay_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    RelayState,
    check_files_and_send_emails,
    health_check,
    send_email,
    send_welcome_email,
};

/// ルーターを構築する
///
/// ルート名は既存クライアントとの互換性のため camelCase のまま維持する。
/// `max_request_bytes` は添付ファイルを含むリクエストボディ全体の上限。
pub fn build_app(state: Arc<RelayState>, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/sendEmail",
            post(send_email).layer(DefaultBodyLimit::max(max_request_bytes)),
        )
        .route("/checkFilesAndSendEmails", get(check_files_and_send_emails))
        .route("/sendWelcomeEmail", post(send_welcome_email))
        .with_state(state)
        // レイヤー順序: 下に書いたものが外側
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: request_id を含むスパンを作成
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. CorsLayer: ブラウザからの呼び出しをすべてのオリジンに許可
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
