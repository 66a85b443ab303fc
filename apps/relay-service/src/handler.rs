//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、入力の取り出しとレスポンス整形だけを行う

pub mod health;
pub mod scan;
pub mod send_email;
pub mod welcome;

use std::sync::Arc;

pub use health::health_check;
pub use scan::check_files_and_send_emails;
pub use send_email::send_email;
pub use welcome::send_welcome_email;

use crate::usecase::{BucketScanUseCase, DirectSendUseCase, WelcomeUseCase};

/// ハンドラ共通の State
pub struct RelayState {
    pub direct_send: DirectSendUseCase,
    pub scan:        Arc<BucketScanUseCase>,
    pub welcome:     WelcomeUseCase,
}
