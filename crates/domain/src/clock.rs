//! # Clock（時刻プロバイダ）
//!
//! 当日照合と日次スケジュールで `Local::now()` を直接呼ばず、
//! テストで固定時刻を注入可能にするための抽象化。
//!
//! 「今日」はホストのローカル時刻で判定する（タイムゾーンの変換は行わない）。

use chrono::{Local, NaiveDate, NaiveDateTime};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    /// ローカル時刻での現在日時
    fn now(&self) -> NaiveDateTime;

    /// ローカル時刻での今日の日付
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// 指定日の 00:00 に固定する
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: date.and_time(chrono::NaiveTime::MIN),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
