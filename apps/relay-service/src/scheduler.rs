//! # 定期走査スケジューラ
//!
//! 毎日決まったローカル時刻にバケット走査を実行する tokio タスク。
//!
//! 次回実行時刻を [`Clock`] から算出し、その時刻まで sleep してから
//! HTTP ルートと同じ [`BucketScanUseCase`] を呼ぶ。走査結果はログに出すだけで、
//! 失敗時のリトライは行わない（翌日の実行を待つ）。
//!
//! 2 回目以降の実行時刻は、直前の予定時刻と現在時刻の遅い方を基準に求める。
//! タイマーが壁時計より先に起きても、同じ日の枠で二重に走査しない。

use std::{fmt, str::FromStr, sync::Arc};

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use paperless_relay_domain::clock::Clock;
use tokio::task::JoinHandle;

use crate::usecase::BucketScanUseCase;

/// 実行時刻の書式（`HH:MM`）
const SCHEDULE_FORMAT: &str = "%H:%M";

/// 毎日の実行時刻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    time: NaiveTime,
}

impl DailySchedule {
    pub fn at(time: NaiveTime) -> Self {
        Self { time }
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// `now` より後の最初の実行日時
    ///
    /// 当日の実行時刻をまだ過ぎていなければ当日、過ぎていれば（ちょうどの場合も）翌日。
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time);
        if today > now {
            today
        } else {
            today + TimeDelta::days(1)
        }
    }
}

impl FromStr for DailySchedule {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), SCHEDULE_FORMAT).map(Self::at)
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format(SCHEDULE_FORMAT))
    }
}

/// 毎日のバケット走査タスクを起動する
///
/// 返り値の `JoinHandle` を abort するまで実行し続ける。
pub fn spawn_daily_scan(
    usecase: Arc<BucketScanUseCase>,
    schedule: DailySchedule,
    clock: Arc<dyn Clock>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut next_run = schedule.next_run_after(clock.now());
        loop {
            let wait = (next_run - clock.now()).to_std().unwrap_or_default();

            tracing::info!(
                next_run = %next_run,
                wait_secs = wait.as_secs(),
                "次回のバケット走査を予約しました"
            );
            tokio::time::sleep(wait).await;

            match usecase.scan_and_notify().await {
                Ok(outcome) => {
                    tracing::info!(
                        emails_sent = outcome.emails_sent.len(),
                        matched = outcome.matched,
                        failed = outcome.failed,
                        "定期バケット走査が完了しました"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "定期バケット走査に失敗しました");
                }
            }

            next_run = schedule.next_run_after(clock.now().max(next_run));
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use paperless_relay_domain::{clock::FixedClock, object_key::MatchPolicy};
    use paperless_relay_infra::mock::{MockNotificationSender, MockObjectStore};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::usecase::{MailComposer, TemplateRenderer};

    fn datetime(date: (i32, u32, u32), time: (u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(time.0, time.1, 0)
            .unwrap()
    }

    fn nine_oclock() -> DailySchedule {
        "09:00".parse().unwrap()
    }

    #[rstest]
    #[case::実行時刻前なら当日((2024, 7, 1), (8, 30), (2024, 7, 1))]
    #[case::実行時刻ちょうどなら翌日((2024, 7, 1), (9, 0), (2024, 7, 2))]
    #[case::実行時刻後なら翌日((2024, 7, 1), (17, 45), (2024, 7, 2))]
    #[case::月末は翌月に繰り上がる((2024, 7, 31), (23, 59), (2024, 8, 1))]
    fn test_次回実行日時(
        #[case] now_date: (i32, u32, u32),
        #[case] now_time: (u32, u32),
        #[case] expected_date: (i32, u32, u32),
    ) {
        let next = nine_oclock().next_run_after(datetime(now_date, now_time));

        assert_eq!(next, datetime(expected_date, (9, 0)));
    }

    #[rstest]
    #[case("9am")]
    #[case("25:00")]
    #[case("")]
    fn test_不正な時刻はパースエラー(#[case] input: &str) {
        assert!(input.parse::<DailySchedule>().is_err());
    }

    #[test]
    fn test_displayはhh_mm形式() {
        let schedule: DailySchedule = " 07:05 ".parse().unwrap();

        assert_eq!(schedule.to_string(), "07:05");
    }

    #[tokio::test(start_paused = true)]
    async fn test_実行時刻になると走査して送信する() {
        let now = datetime((2024, 7, 1), (8, 30));
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));

        let store = MockObjectStore::new();
        store.put("v2/alice@x.com/repairs/24-07-01_order.pdf", b"%PDF-".to_vec());
        let sender = MockNotificationSender::new();

        let usecase = Arc::new(BucketScanUseCase::new(
            Arc::new(store),
            Arc::new(MailComposer::new(Arc::new(sender.clone()))),
            Arc::new(TemplateRenderer::new().unwrap()),
            clock.clone(),
            MatchPolicy::new("v2", ["repairs", "installations"]),
        ));

        let handle = spawn_daily_scan(usecase, nine_oclock(), clock);

        // 実行時刻（30 分後）の直前ではまだ送信しない
        tokio::time::sleep(Duration::from_secs(29 * 60)).await;
        assert!(sender.sent_emails().is_empty());

        // 実行時刻を過ぎると 1 回だけ走査する
        tokio::time::sleep(Duration::from_secs(15 * 60)).await;
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "alice@x.com");

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_壁時計が実行時刻に届いていなくても同じ日に再走査しない() {
        // 壁時計が 08:30 のまま進まない（タイマーだけが進む）状況
        let now = datetime((2024, 7, 1), (8, 30));
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));

        let store = MockObjectStore::new();
        store.put("v2/alice@x.com/repairs/24-07-01_order.pdf", b"%PDF-".to_vec());
        let sender = MockNotificationSender::new();

        let usecase = Arc::new(BucketScanUseCase::new(
            Arc::new(store),
            Arc::new(MailComposer::new(Arc::new(sender.clone()))),
            Arc::new(TemplateRenderer::new().unwrap()),
            clock.clone(),
            MatchPolicy::new("v2", ["repairs"]),
        ));

        let handle = spawn_daily_scan(usecase, nine_oclock(), clock);

        tokio::time::sleep(Duration::from_secs(31 * 60)).await;
        assert_eq!(sender.sent_emails().len(), 1);

        // 次の予定は翌日 09:00 なので、数時間経っても送信は増えない
        tokio::time::sleep(Duration::from_secs(6 * 60 * 60)).await;
        assert_eq!(sender.sent_emails().len(), 1);

        handle.abort();
    }
}
