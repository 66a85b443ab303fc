//! # インフラ層エラー定義
//!
//! オブジェクトストレージなど外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! convenience constructor でエラーを生成すると、その時点のスパン情報
//! （どの走査・どのキーの処理中だったか）が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// オブジェクトストレージエラー
    ///
    /// AWS SDK のエラー型はジェネリクスが深く `#[from]` が困難なため、
    /// 手動で String にマップする。
    #[error("オブジェクトストレージエラー: {0}")]
    ObjectStorage(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// オブジェクトストレージエラーを生成する
    pub fn object_storage(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::ObjectStorage(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_object_storageでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_scan", bucket = "relay-documents");
            let _enter = span.enter();

            let err = InfraError::object_storage("一覧取得失敗");

            assert!(matches!(
                &err.kind,
                InfraErrorKind::ObjectStorage(msg) if msg == "一覧取得失敗"
            ));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_scan"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::object_storage("bucket unreachable");
        assert_eq!(
            format!("{err}"),
            "オブジェクトストレージエラー: bucket unreachable"
        );
    }
}
