// src/handlers/pages.rs

use astra::Body;
use chrono::{DateTime, Utc};
use http::request::Parts;

use crate::app::App;
use crate::db::{self, ListingFilter};
use crate::domain::feedback::FeedbackInput;
use crate::domain::listing::Tier;
use crate::domain::pagination::{page_window, paginate, total_pages};
use crate::domain::phone::Operator;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{cookie, is_admin, page_param, query_params, read_form, search_query};
use crate::responses::{html_response, html_response_with_cookie, html_response_with_status, set_cookie};
use crate::templates::pages::{feedback_page, listings_page, FeedbackFormVm, ListingCardVm, ListingsVm};

pub const VISITOR_COOKIE: &str = "visitor";
const VISITOR_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

/// Which slice of the catalogue a public page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScope {
    All,
    Tier(Tier),
    Operator(Operator),
}

impl PageScope {
    fn title(&self) -> String {
        match self {
            PageScope::All => "All numbers".to_string(),
            PageScope::Tier(Tier::Gold) => "Gold numbers".to_string(),
            PageScope::Tier(Tier::Premium) => "Premium numbers".to_string(),
            PageScope::Tier(Tier::Standard) => "Standard numbers".to_string(),
            PageScope::Operator(op) => format!("{} numbers", op.name()),
        }
    }

    fn base_path(&self) -> String {
        match self {
            PageScope::All => "/".to_string(),
            PageScope::Tier(t) => format!("/{}", t.as_str()),
            PageScope::Operator(op) => format!("/numbers/{}", op.slug()),
        }
    }
}

/// Count the visit, then the page view. Returns the cookie to set on a first visit.
fn track_visit(app: &App, parts: &Parts, now: DateTime<Utc>) -> Option<String> {
    let stats = app.stats();
    let first_visit = cookie(parts, VISITOR_COOKIE).is_none();
    if first_visit {
        stats.increment_visitor(now);
    }
    stats.increment_page_view(now);

    first_visit.then(|| set_cookie(VISITOR_COOKIE, "1", VISITOR_COOKIE_MAX_AGE))
}

pub fn listing_page(app: &App, parts: &Parts, scope: PageScope) -> ResultResp {
    let now = Utc::now();
    let params = query_params(parts);
    let mut query = search_query(&params);

    let mut filter = ListingFilter::public(now);
    match scope {
        PageScope::All => {}
        PageScope::Tier(tier) => {
            filter.tier = Some(tier);
            query.selected_tier.clear();
        }
        PageScope::Operator(op) => query.operator_scope = Some(op.slug().to_string()),
    }

    let listings = app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &filter))?;

    let engine = app.filter_engine();
    let matched = engine.filter(&listings, &query);

    let page_size = app.config.search.page_size;
    let pages = total_pages(matched.len(), page_size);
    let page = page_param(&params);

    let cards = paginate(&matched, page, page_size)
        .iter()
        .map(|l| ListingCardVm {
            spans: engine
                .matcher()
                .match_phone(&l.phone_number, &query.search_term)
                .spans,
            listing: l.clone(),
        })
        .collect();

    let title = scope.title();
    let base_path = scope.base_path();
    let is_admin = is_admin(app, parts, now.timestamp())?;

    let markup = listings_page(&ListingsVm {
        title: &title,
        base_path: &base_path,
        query: &query,
        show_tier_filter: !matches!(scope, PageScope::Tier(_)),
        cards,
        total: matched.len(),
        page,
        window: page_window(page, pages),
        is_admin,
    });

    match track_visit(app, parts, now) {
        Some(cookie) => html_response_with_cookie(markup, &cookie),
        None => html_response(markup),
    }
}

pub fn operator_page(app: &App, parts: &Parts, slug: &str) -> ResultResp {
    let op = Operator::parse(slug).ok_or(ServerError::NotFound)?;
    listing_page(app, parts, PageScope::Operator(op))
}

pub fn feedback_form() -> ResultResp {
    let input = FeedbackInput::default();
    html_response(feedback_page(&FeedbackFormVm {
        input: &input,
        errors: &[],
        submitted: false,
    }))
}

pub fn submit_feedback(app: &App, body: Body) -> ResultResp {
    let form = read_form(body)?;
    let get = |k: &str| form.get(k).cloned().unwrap_or_default();

    let input = FeedbackInput {
        name: get("name"),
        email: get("email"),
        phone: get("phone"),
        rating: form.get("rating").and_then(|r| r.trim().parse().ok()),
        feedback_type: get("type"),
        subject: get("subject"),
        message: get("message"),
    };

    match input.validate() {
        Ok(valid) => {
            let now = Utc::now().timestamp();
            app.db
                .with_conn(|conn| db::feedback::insert_feedback(conn, &valid, now))?;
            log::info!("Feedback received ({})", valid.feedback_type);

            html_response(feedback_page(&FeedbackFormVm {
                input: &input,
                errors: &[],
                submitted: true,
            }))
        }
        Err(ServerError::Validation(errors)) => html_response_with_status(
            400,
            feedback_page(&FeedbackFormVm {
                input: &input,
                errors: &errors,
                submitted: false,
            }),
        ),
        Err(e) => Err(e),
    }
}
