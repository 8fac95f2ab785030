// src/handlers/api.rs

use astra::Body;
use chrono::Utc;
use http::request::Parts;
use serde::Deserialize;
use serde_json::json;

use crate::app::App;
use crate::auth::token::secrets_equal;
use crate::db::{self, ListingFilter};
use crate::domain::feedback::FeedbackInput;
use crate::domain::listing::{ListingInput, ListingStatus, ListingView, Tier};
use crate::domain::pagination::slice_offset;
use crate::domain::phone::Operator;
use crate::domain::statistics::{month_key, parse_month_key, previous_month_key};
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{bearer_token, is_admin, query_params, read_json, search_query};
use crate::responses::{json_created, json_ok, json_response};

fn require_admin(app: &App, parts: &Parts) -> Result<(), ServerError> {
    if is_admin(app, parts, Utc::now().timestamp())? {
        Ok(())
    } else {
        Err(ServerError::Unauthorized("Admin session required".into()))
    }
}

/// `GET /api/listings?type=&operator=&status=&prefix=&q=&limit=&offset=`
///
/// Without `status` only live listings (active and unexpired) are returned.
pub fn list_listings(app: &App, parts: &Parts) -> ResultResp {
    let now = Utc::now();
    let params = query_params(parts);
    let param = |k: &str| params.get(k).map(|v| v.trim()).filter(|v| !v.is_empty());

    let mut filter = match param("status") {
        Some(s) => ListingFilter {
            status: Some(s.parse::<ListingStatus>()?),
            ..Default::default()
        },
        None => ListingFilter::public(now),
    };
    if let Some(t) = param("type") {
        filter.tier = Some(t.parse::<Tier>()?);
    }
    if let Some(op) = param("operator") {
        filter.operator = Some(
            Operator::parse(op)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown operator '{op}'")))?,
        );
    }

    let search_cfg = &app.config.search;
    let limit = match param("limit") {
        Some(l) => l
            .parse::<usize>()
            .map_err(|_| ServerError::BadRequest("limit must be a number".into()))?
            .clamp(1, search_cfg.max_page_size),
        None => search_cfg.page_size,
    };
    let offset = match param("offset") {
        Some(o) => o
            .parse::<usize>()
            .map_err(|_| ServerError::BadRequest("offset must be a number".into()))?,
        None => 0,
    };

    let listings = app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &filter))?;

    // Tier and operator were applied in storage.
    let mut query = search_query(&params);
    query.selected_tier.clear();
    let matched = app.filter_engine().filter(&listings, &query);

    let page: Vec<ListingView> = slice_offset(&matched, offset, limit)
        .iter()
        .map(ListingView::from)
        .collect();
    let total = matched.len();

    json_response(
        200,
        &json!({
            "success": true,
            "data": page,
            "pagination": {
                "total": total,
                "limit": limit,
                "offset": offset,
                "hasMore": offset.saturating_add(limit) < total,
            },
        }),
    )
}

pub fn get_listing(app: &App, id: &str) -> ResultResp {
    let listing = app
        .db
        .with_conn(|conn| db::listings::get_listing(conn, id))?
        .ok_or(ServerError::NotFound)?;
    json_ok(&ListingView::from(&listing))
}

pub fn create_listing(app: &App, parts: &Parts, body: Body) -> ResultResp {
    require_admin(app, parts)?;
    let input: ListingInput = read_json(body)?;
    let valid = input.validate()?;

    let created = app
        .db
        .with_conn(|conn| db::listings::create_listing(conn, &valid, Utc::now()))?;
    log::info!("Listing {} created via API", created.id);
    json_created(&ListingView::from(&created))
}

pub fn update_listing(app: &App, parts: &Parts, id: &str, body: Body) -> ResultResp {
    require_admin(app, parts)?;
    let input: ListingInput = read_json(body)?;
    let valid = input.validate()?;

    let updated = app
        .db
        .with_conn(|conn| db::listings::update_listing(conn, id, &valid, Utc::now()))?;
    json_ok(&ListingView::from(&updated))
}

pub fn delete_listing(app: &App, parts: &Parts, id: &str) -> ResultResp {
    require_admin(app, parts)?;
    app.db
        .with_conn(|conn| db::listings::delete_listing(conn, id))?;
    log::info!("Listing {id} deleted via API");
    json_response(200, &json!({ "success": true, "message": "Listing deleted" }))
}

#[derive(Debug, Deserialize)]
struct StatisticsAction {
    action: String,
    #[serde(default)]
    month: Option<String>,
}

pub fn get_statistics(app: &App) -> ResultResp {
    json_ok(&app.stats().snapshot(Utc::now()))
}

/// `POST /api/statistics` with `increment_visitor` or `increment_sold`.
pub fn post_statistics(app: &App, body: Body) -> ResultResp {
    let req: StatisticsAction = read_json(body)?;
    let now = Utc::now();
    let stats = app.stats();

    let recorded = match req.action.as_str() {
        "increment_visitor" => stats.increment_visitor(now),
        "increment_sold" => stats.increment_sold(now),
        other => return Err(ServerError::BadRequest(format!("unknown action '{other}'"))),
    };

    json_response(
        200,
        &json!({ "success": true, "recorded": recorded, "data": stats.snapshot(now) }),
    )
}

fn month_param(value: Option<&str>) -> Result<Option<String>, ServerError> {
    match value.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => parse_month_key(m)
            .map(Some)
            .ok_or_else(|| ServerError::BadRequest(format!("invalid month '{m}', expected YYYY-MM"))),
        None => Ok(None),
    }
}

/// `GET /api/statistics/monthly?month=YYYY-MM`, defaulting to the current month.
pub fn get_monthly(app: &App, parts: &Parts) -> ResultResp {
    let params = query_params(parts);
    let month = month_param(params.get("month").map(String::as_str))?
        .unwrap_or_else(|| month_key(Utc::now().timestamp()));
    json_ok(&app.stats().month_snapshot(&month))
}

/// Increments always target the current month. `reset_month` needs an admin.
pub fn post_monthly(app: &App, parts: &Parts, body: Body) -> ResultResp {
    let req: StatisticsAction = read_json(body)?;
    let now = Utc::now();
    let stats = app.stats();
    let current = month_key(now.timestamp());

    let (recorded, month) = match req.action.as_str() {
        "increment_visitor" => (stats.increment_visitor(now), current),
        "increment_pageview" => (stats.increment_page_view(now), current),
        "reset_month" => {
            require_admin(app, parts)?;
            let month = month_param(req.month.as_deref())?.unwrap_or(current);
            stats.reset_month(&month, now)?;
            (true, month)
        }
        other => return Err(ServerError::BadRequest(format!("unknown action '{other}'"))),
    };

    json_response(
        200,
        &json!({ "success": true, "recorded": recorded, "data": stats.month_snapshot(&month) }),
    )
}

/// Scheduler hook: zero the current month. Accepts the cron bearer secret or
/// an admin session.
pub fn cron_reset_monthly(app: &App, parts: &Parts) -> ResultResp {
    let by_secret = match (&app.config.admin.cron_secret, bearer_token(parts)) {
        (Some(secret), Some(given)) => secrets_equal(secret.as_bytes(), given.as_bytes()),
        _ => false,
    };
    if !by_secret {
        require_admin(app, parts)?;
    }

    let now = Utc::now();
    let stats = app.stats();
    let current = month_key(now.timestamp());
    stats.reset_month(&current, now)?;

    let previous = previous_month_key(&current)
        .and_then(|m| app.db.with_conn(|conn| db::statistics::get_month(conn, &m)).ok().flatten());

    json_response(
        200,
        &json!({
            "success": true,
            "message": "Monthly statistics reset successfully",
            "data": {
                "currentMonth": stats.month_snapshot(&current),
                "previousMonth": previous,
            },
            "metadata": { "executedAt": now },
        }),
    )
}

/// Admin only: newest feedback first.
pub fn list_feedback(app: &App, parts: &Parts) -> ResultResp {
    require_admin(app, parts)?;
    let items = app
        .db
        .with_conn(|conn| db::feedback::list_feedback(conn))?;
    json_ok(&items)
}

pub fn submit_feedback(app: &App, body: Body) -> ResultResp {
    let input: FeedbackInput = read_json(body)?;
    let valid = input.validate()?;
    let now = Utc::now().timestamp();

    let id = app
        .db
        .with_conn(|conn| db::feedback::insert_feedback(conn, &valid, now))?;
    log::info!("Feedback {id} received via API");

    json_response(
        201,
        &json!({ "success": true, "message": "Thank you for your feedback", "data": { "id": id } }),
    )
}
