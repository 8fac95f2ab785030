// src/db/statistics.rs
//
// Counters are only ever changed with single `x = x + 1` updates so that
// concurrent writers on separate connections never lose an increment.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::listings::count_active;
use crate::domain::statistics::{MonthlySnapshot, StatisticsSnapshot};
use crate::errors::ServerError;

const GLOBAL_ROW_ID: i64 = 1;

/// Find-or-create the single global row.
pub fn ensure_global_row(conn: &Connection, now: DateTime<Utc>) -> Result<(), ServerError> {
    conn.execute(
        "insert or ignore into statistics (id, last_updated) values (?, ?)",
        params![GLOBAL_ROW_ID, now],
    )
    .map_err(|e| ServerError::DbError(format!("create statistics row failed: {e}")))?;
    Ok(())
}

/// Find-or-create the row for `month` (`YYYY-MM`).
pub fn ensure_month_row(conn: &Connection, month: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
    conn.execute(
        "insert or ignore into monthly_stats (month, last_updated) values (?, ?)",
        params![month, now],
    )
    .map_err(|e| ServerError::DbError(format!("create monthly stats row failed: {e}")))?;
    Ok(())
}

/// Bumps the global visitor counters and the month's visitors.
pub fn increment_visitor(conn: &Connection, month: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
    ensure_global_row(conn, now)?;
    ensure_month_row(conn, month, now)?;

    conn.execute(
        r#"
        update statistics
        set total_visitors = total_visitors + 1,
            today_visitors = today_visitors + 1,
            last_updated = ?2
        where id = ?1
        "#,
        params![GLOBAL_ROW_ID, now],
    )
    .map_err(|e| ServerError::DbError(format!("increment visitors failed: {e}")))?;

    conn.execute(
        "update monthly_stats set visitors = visitors + 1, last_updated = ?2 where month = ?1",
        params![month, now],
    )
    .map_err(|e| ServerError::DbError(format!("increment monthly visitors failed: {e}")))?;

    Ok(())
}

pub fn increment_sold(conn: &Connection, now: DateTime<Utc>) -> Result<(), ServerError> {
    ensure_global_row(conn, now)?;
    conn.execute(
        "update statistics set total_sold = total_sold + 1, last_updated = ?2 where id = ?1",
        params![GLOBAL_ROW_ID, now],
    )
    .map_err(|e| ServerError::DbError(format!("increment sold failed: {e}")))?;
    Ok(())
}

pub fn increment_page_view(conn: &Connection, month: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
    ensure_month_row(conn, month, now)?;
    conn.execute(
        "update monthly_stats set page_views = page_views + 1, last_updated = ?2 where month = ?1",
        params![month, now],
    )
    .map_err(|e| ServerError::DbError(format!("increment page views failed: {e}")))?;
    Ok(())
}

/// Zero the month's counters. Safe to repeat.
pub fn reset_month(conn: &Connection, month: &str, now: DateTime<Utc>) -> Result<(), ServerError> {
    ensure_month_row(conn, month, now)?;
    conn.execute(
        "update monthly_stats set visitors = 0, page_views = 0, last_updated = ?2 where month = ?1",
        params![month, now],
    )
    .map_err(|e| ServerError::DbError(format!("reset month failed: {e}")))?;
    Ok(())
}

/// Store the current count of active listings and return it.
pub fn recompute_total_listings(conn: &Connection, now: DateTime<Utc>) -> Result<i64, ServerError> {
    ensure_global_row(conn, now)?;
    let active = count_active(conn)?;
    conn.execute(
        "update statistics set total_listings = ?2, last_updated = ?3 where id = ?1",
        params![GLOBAL_ROW_ID, active, now],
    )
    .map_err(|e| ServerError::DbError(format!("recompute total listings failed: {e}")))?;

    Ok(active)
}

pub fn get_global(conn: &Connection, now: DateTime<Utc>) -> Result<StatisticsSnapshot, ServerError> {
    ensure_global_row(conn, now)?;
    conn.query_row(
        r#"
        select total_visitors, today_visitors, total_sold, total_listings, last_updated
        from statistics
        where id = ?
        "#,
        params![GLOBAL_ROW_ID],
        |r| {
            Ok(StatisticsSnapshot {
                total_visitors: r.get(0)?,
                today_visitors: r.get(1)?,
                total_sold: r.get(2)?,
                total_listings: r.get(3)?,
                last_updated: r.get(4).ok(),
            })
        },
    )
    .map_err(|e| ServerError::DbError(format!("load statistics failed: {e}")))
}

/// The month's counters, or `None` if nothing touched that month yet.
pub fn get_month(conn: &Connection, month: &str) -> Result<Option<MonthlySnapshot>, ServerError> {
    conn.query_row(
        "select month, visitors, page_views, last_updated from monthly_stats where month = ?",
        params![month],
        |r| {
            Ok(MonthlySnapshot {
                month: r.get(0)?,
                visitors: r.get(1)?,
                page_views: r.get(2)?,
                last_updated: r.get(3).ok(),
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("load monthly stats failed: {e}")))
}
