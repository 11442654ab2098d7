//! Rolling-window download totals.

use crate::CounterHandle;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tracing::instrument;

const HOUR_STAMP: &[BorrowedFormatItem<'_>] = format_description!("[year repr:last_two]-[month]-[day]-[hour]");
const DAILY_STAMP: &[BorrowedFormatItem<'_>] = format_description!("[year repr:last_two]-[month]-[day]");

/// Hourly buckets covering the last day (both ends inclusive).
const LAST_DAY_BUCKETS: i32 = 25;
/// Daily buckets covering the last week.
const LAST_WEEK_BUCKETS: i32 = 8;
/// Daily buckets covering the last month.
const LAST_MONTH_BUCKETS: i32 = 31;

/// Granularity of a counter bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Hour,
    Daily,
}
impl Precision {
    fn name(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Daily => "daily",
        }
    }

    fn step(&self) -> Duration {
        match self {
            Self::Hour => Duration::HOUR,
            Self::Daily => Duration::DAY,
        }
    }

    /// Counter store key of the bucket containing `at`.
    ///
    /// ```
    /// use cheeseshop_counters::Precision;
    /// use time::macros::datetime;
    ///
    /// let at = datetime!(2013-01-30 14:45 UTC);
    /// assert_eq!(Precision::Hour.key(at, "foo").unwrap(), "downloads:hour:13-01-30-14:foo");
    /// assert_eq!(Precision::Daily.key(at, "foo").unwrap(), "downloads:daily:13-01-30:foo");
    /// ```
    pub fn key(&self, at: OffsetDateTime, project: &str) -> Result<String> {
        let format = match self {
            Self::Hour => HOUR_STAMP,
            Self::Daily => DAILY_STAMP,
        };
        let stamp = at.format(format).or_raise(|| ErrorKind::InvalidKey)?;
        Ok(format!("downloads:{}:{stamp}:{project}", self.name()))
    }
}

/// Download totals of one project over the three reporting windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DownloadCounts {
    pub last_day: u64,
    pub last_week: u64,
    pub last_month: u64,
}

/// Reads per-project download totals from a [`CounterStore`](crate::CounterStore).
#[derive(Clone)]
pub struct DownloadCounter {
    store: CounterHandle,
}
impl DownloadCounter {
    pub fn new(store: CounterHandle) -> Self {
        Self { store }
    }

    /// Download totals for a project as of now.
    pub async fn counts(&self, project: &str) -> Result<DownloadCounts> {
        self.counts_at(project, OffsetDateTime::now_utc()).await
    }

    /// Download totals for a project as of `now`.
    ///
    /// Issues exactly one batch request per window. Missing buckets and
    /// values that are not non-negative integers count as zero.
    #[instrument(level = "debug", skip(self))]
    pub async fn counts_at(&self, project: &str, now: OffsetDateTime) -> Result<DownloadCounts> {
        let last_day = self.window(project, Precision::Hour, now - Duration::DAY, LAST_DAY_BUCKETS).await?;
        let last_week = self.window(project, Precision::Daily, now - Duration::days(7), LAST_WEEK_BUCKETS).await?;
        let last_month = self.window(project, Precision::Daily, now - Duration::days(30), LAST_MONTH_BUCKETS).await?;
        Ok(DownloadCounts { last_day, last_week, last_month })
    }

    async fn window(&self, project: &str, precision: Precision, start: OffsetDateTime, buckets: i32) -> Result<u64> {
        let keys = (0..buckets)
            .map(|n| precision.key(start + precision.step() * n, project))
            .collect::<Result<Vec<_>>>()?;
        let values = self.store.mget(&keys).await?;
        Ok(sum(&values))
    }
}

fn sum(values: &[Option<String>]) -> u64 {
    values
        .iter()
        .flatten()
        .map(|value| match value.trim().parse::<u64>() {
            Ok(count) => count,
            Err(_) => {
                tracing::debug!(value = %value, "Ignoring non-numeric download counter");
                0
            },
        })
        .fold(0u64, u64::saturating_add)
}
