// src/domain/statistics.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use time::{Month, OffsetDateTime};

use crate::db::{self, Database};
use crate::errors::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub total_visitors: i64,
    pub today_visitors: i64,
    pub total_sold: i64,
    pub total_listings: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: String,
    pub visitors: i64,
    pub page_views: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl MonthlySnapshot {
    pub fn empty(month: &str) -> Self {
        Self {
            month: month.to_string(),
            ..Default::default()
        }
    }
}

/// `YYYY-MM` in UTC for a unix timestamp.
pub fn month_key(now_unix: i64) -> String {
    let t = OffsetDateTime::from_unix_timestamp(now_unix).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    format!("{:04}-{:02}", t.year(), u8::from(t.month()))
}

/// Accepts `YYYY-MM` with a real month and returns it zero-padded.
pub fn parse_month_key(value: &str) -> Option<String> {
    let (year, month) = value.trim().split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Some(format!("{year:04}-{:02}", u8::from(month)))
}

/// `2024-01` -> `2023-12`. `None` for malformed keys.
pub fn previous_month_key(month: &str) -> Option<String> {
    let key = parse_month_key(month)?;
    let (year, month) = key.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let prev_year = if month == Month::January { year - 1 } else { year };
    Some(format!("{prev_year:04}-{:02}", u8::from(month.previous())))
}

pub struct StatisticsAggregator<'a> {
    db: &'a Database,
}

impl<'a> StatisticsAggregator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Returns false when the increment was not stored.
    pub fn increment_visitor(&self, now: DateTime<Utc>) -> bool {
        let month = month_key(now.timestamp());
        let res = self
            .db
            .with_conn(|conn| db::statistics::increment_visitor(conn, &month, now));
        stored("increment_visitor", res)
    }

    pub fn increment_sold(&self, now: DateTime<Utc>) -> bool {
        let res = self
            .db
            .with_conn(|conn| db::statistics::increment_sold(conn, now));
        stored("increment_sold", res)
    }

    pub fn increment_page_view(&self, now: DateTime<Utc>) -> bool {
        let month = month_key(now.timestamp());
        let res = self
            .db
            .with_conn(|conn| db::statistics::increment_page_view(conn, &month, now));
        stored("increment_page_view", res)
    }

    /// Called by the scheduler endpoint, which needs to report failure.
    pub fn reset_month(&self, month: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
        self.db
            .with_conn(|conn| db::statistics::reset_month(conn, month, now))?;
        log::info!("Monthly statistics reset for {month}");
        Ok(())
    }

    /// Global counters with a freshly recomputed listing total.
    pub fn snapshot(&self, now: DateTime<Utc>) -> StatisticsSnapshot {
        let res = self.db.with_conn(|conn| {
            db::statistics::recompute_total_listings(conn, now)?;
            db::statistics::get_global(conn, now)
        });
        match res {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Statistics unavailable, showing defaults: {e}");
                StatisticsSnapshot::default()
            }
        }
    }

    pub fn month_snapshot(&self, month: &str) -> MonthlySnapshot {
        match self.db.with_conn(|conn| db::statistics::get_month(conn, month)) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => MonthlySnapshot::empty(month),
            Err(e) => {
                log::warn!("Monthly statistics for {month} unavailable: {e}");
                MonthlySnapshot::empty(month)
            }
        }
    }

    pub fn current_month(&self, now: DateTime<Utc>) -> MonthlySnapshot {
        self.month_snapshot(&month_key(now.timestamp()))
    }
}

fn stored(what: &str, res: Result<(), ServerError>) -> bool {
    match res {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Statistics {what} not recorded: {e}");
            false
        }
    }
}
