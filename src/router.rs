use crate::app::App;
use crate::domain::listing::Tier;
use crate::errors::ServerError;
use crate::handlers::pages::PageScope;
use crate::handlers::{admin, api, pages};
use crate::responses::{json_error_response, ResultResp};
use astra::Request;

/// Route a request. HTML routes return errors for the caller to render as a
/// page; `/api/*` routes always come back as JSON, errors included.
pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();
    let method = parts.method.as_str();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if let ["api", rest @ ..] = segments.as_slice() {
        let resp = match (method, rest) {
            ("GET", ["listings"]) => api::list_listings(app, &parts),
            ("POST", ["listings"]) => api::create_listing(app, &parts, body),
            ("GET", ["listings", id]) => api::get_listing(app, id),
            ("PUT", ["listings", id]) => api::update_listing(app, &parts, id, body),
            ("DELETE", ["listings", id]) => api::delete_listing(app, &parts, id),

            ("GET", ["statistics"]) => api::get_statistics(app),
            ("POST", ["statistics"]) => api::post_statistics(app, body),
            ("GET", ["statistics", "monthly"]) => api::get_monthly(app, &parts),
            ("POST", ["statistics", "monthly"]) => api::post_monthly(app, &parts, body),
            ("GET", ["cron", "reset-monthly-stats"]) => api::cron_reset_monthly(app, &parts),

            ("GET", ["feedback"]) => api::list_feedback(app, &parts),
            ("POST", ["feedback"]) => api::submit_feedback(app, body),

            _ => Err(ServerError::NotFound),
        };
        return Ok(resp.unwrap_or_else(json_error_response));
    }

    match (method, segments.as_slice()) {
        ("GET", [""]) => pages::listing_page(app, &parts, PageScope::All),
        ("GET", ["gold"]) => pages::listing_page(app, &parts, PageScope::Tier(Tier::Gold)),
        ("GET", ["premium"]) => pages::listing_page(app, &parts, PageScope::Tier(Tier::Premium)),
        ("GET", ["numbers", slug]) => pages::operator_page(app, &parts, slug),

        ("GET", ["feedback"]) => pages::feedback_form(),
        ("POST", ["feedback"]) => pages::submit_feedback(app, body),

        ("GET", ["admin", "login"]) => admin::login_form(app, &parts),
        ("POST", ["admin", "login"]) => admin::login(app, body),
        ("GET" | "POST", ["admin", "logout"]) => admin::logout(app, &parts),
        ("GET", ["admin"]) => admin::dashboard(app, &parts),
        ("GET", ["admin", "export"]) => admin::export(app, &parts),
        ("POST", ["admin", "listings"]) => admin::create_listing(app, &parts, body),
        ("POST", ["admin", "listings", id]) => admin::update_listing(app, &parts, id, body),
        ("POST", ["admin", "listings", id, "delete"]) => admin::delete_listing(app, &parts, id),
        ("POST", ["admin", "listings", id, "sold"]) => admin::mark_sold(app, &parts, id),
        ("POST", ["admin", "feedback", id, "delete"]) => admin::delete_feedback(app, &parts, id),

        _ => Err(ServerError::NotFound),
    }
}
