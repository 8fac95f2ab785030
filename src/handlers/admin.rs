// src/handlers/admin.rs

use std::collections::HashMap;

use astra::Body;
use chrono::Utc;
use http::request::Parts;

use crate::app::App;
use crate::auth::{sessions, token::password_matches, SESSION_COOKIE};
use crate::db::{self, ListingFilter};
use crate::domain::listing::{parse_price_azn, Listing, ListingInput};
use crate::domain::pagination::{page_window, paginate, total_pages};
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{cookie, is_admin, page_param, query_params, read_form, search_query};
use crate::responses::{
    clear_cookie, html_response, html_response_with_status, redirect, redirect_with_cookie,
    set_cookie,
};
use crate::spreadsheets::export_listings_xlsx;
use crate::templates::pages::{admin_page, login_page, AdminVm, ListingFormVm};

const LOGIN_PATH: &str = "/admin/login";

pub fn login_form(app: &App, parts: &Parts) -> ResultResp {
    if is_admin(app, parts, Utc::now().timestamp())? {
        return redirect("/admin");
    }
    html_response(login_page(None, app.config.admin_enabled()))
}

pub fn login(app: &App, body: Body) -> ResultResp {
    if !app.config.admin_enabled() {
        return html_response_with_status(403, login_page(None, false));
    }

    let form = read_form(body)?;
    let given = form.get("password").map(String::as_str).unwrap_or("");

    if !password_matches(given, &app.config.admin.password) {
        log::warn!("Rejected admin login attempt");
        return html_response_with_status(401, login_page(Some("Wrong password"), true));
    }

    let ttl = app.config.admin.session_ttl_secs;
    let now = Utc::now().timestamp();
    let token = app
        .db
        .with_conn(|conn| sessions::create_session(conn, now, ttl))?;

    log::info!("Admin signed in");
    redirect_with_cookie("/admin", &set_cookie(SESSION_COOKIE, &token, ttl))
}

pub fn logout(app: &App, parts: &Parts) -> ResultResp {
    if let Some(token) = cookie(parts, SESSION_COOKIE) {
        let now = Utc::now().timestamp();
        app.db
            .with_conn(|conn| sessions::revoke_session(conn, &token, now))?;
    }
    redirect_with_cookie("/", &clear_cookie(SESSION_COOKIE))
}

/// All listings matching the dashboard's search, prefix and tier filters.
fn filtered_listings(app: &App, params: &HashMap<String, String>) -> Result<Vec<Listing>, ServerError> {
    let all = app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &ListingFilter::default()))?;
    Ok(app.filter_engine().filter(&all, &search_query(params)))
}

fn render_dashboard(
    app: &App,
    parts: &Parts,
    status: u16,
    errors: Vec<String>,
    form: ListingFormVm,
    editing: Option<String>,
) -> ResultResp {
    let now = Utc::now();
    let params = query_params(parts);
    let query = search_query(&params);
    let listings = filtered_listings(app, &params)?;

    let page_size = app.config.search.page_size;
    let pages = total_pages(listings.len(), page_size);
    let page = page_param(&params);

    let feedback = app.db.with_conn(|conn| db::feedback::list_feedback(conn))?;
    let stats = app.stats();

    let vm = AdminVm {
        stats: stats.snapshot(now),
        month: stats.current_month(now),
        query: &query,
        rows: paginate(&listings, page, page_size).to_vec(),
        total: listings.len(),
        page,
        window: page_window(page, pages),
        feedback,
        errors,
        form,
        editing,
    };

    html_response_with_status(status, admin_page(&vm))
}

pub fn dashboard(app: &App, parts: &Parts) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }

    let params = query_params(parts);
    let (form, editing) = match params.get("edit") {
        Some(id) => {
            let listing = app
                .db
                .with_conn(|conn| db::listings::get_listing(conn, id))?
                .ok_or(ServerError::NotFound)?;
            (ListingFormVm::from(&listing), Some(listing.id))
        }
        None => (ListingFormVm::default(), None),
    };

    render_dashboard(app, parts, 200, Vec::new(), form, editing)
}

/// Form fields to the validation input. The AZN price is converted here, once.
fn listing_input(form: &HashMap<String, String>) -> (ListingInput, ListingFormVm) {
    let get = |k: &str| form.get(k).map(|v| v.trim().to_string()).unwrap_or_default();
    let checked = |k: &str| form.contains_key(k);

    let vm = ListingFormVm {
        phone_number: get("phone_number"),
        price_azn: get("price"),
        contact_phone: get("contact_phone"),
        tier: get("type"),
        description: get("description"),
        is_seller: checked("is_seller"),
        is_vip: checked("is_vip"),
    };

    let input = ListingInput {
        phone_number: vm.phone_number.clone(),
        price: parse_price_azn(&vm.price_azn),
        contact_phone: vm.contact_phone.clone(),
        tier: vm.tier.clone(),
        description: vm.description.clone(),
        is_seller: vm.is_seller,
        is_vip: vm.is_vip,
    };

    (input, vm)
}

pub fn create_listing(app: &App, parts: &Parts, body: Body) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }

    let (input, vm) = listing_input(&read_form(body)?);
    match input.validate() {
        Ok(valid) => {
            let created = app
                .db
                .with_conn(|conn| db::listings::create_listing(conn, &valid, Utc::now()))?;
            log::info!("Listing {} created ({})", created.id, created.phone_number);
            redirect("/admin")
        }
        Err(ServerError::Validation(errors)) => render_dashboard(app, parts, 400, errors, vm, None),
        Err(e) => Err(e),
    }
}

pub fn update_listing(app: &App, parts: &Parts, id: &str, body: Body) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }

    let (input, vm) = listing_input(&read_form(body)?);
    match input.validate() {
        Ok(valid) => {
            app.db
                .with_conn(|conn| db::listings::update_listing(conn, id, &valid, Utc::now()))?;
            log::info!("Listing {id} updated");
            redirect("/admin")
        }
        Err(ServerError::Validation(errors)) => {
            render_dashboard(app, parts, 400, errors, vm, Some(id.to_string()))
        }
        Err(e) => Err(e),
    }
}

pub fn delete_listing(app: &App, parts: &Parts, id: &str) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }
    app.db
        .with_conn(|conn| db::listings::delete_listing(conn, id))?;
    log::info!("Listing {id} deleted");
    redirect("/admin")
}

pub fn mark_sold(app: &App, parts: &Parts, id: &str) -> ResultResp {
    let now = Utc::now();
    if !is_admin(app, parts, now.timestamp())? {
        return redirect(LOGIN_PATH);
    }

    let changed = app
        .db
        .with_conn(|conn| db::listings::mark_sold(conn, id, now))?;
    if changed {
        app.stats().increment_sold(now);
        log::info!("Listing {id} sold");
    }
    redirect("/admin")
}

pub fn delete_feedback(app: &App, parts: &Parts, id: &str) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }
    let id: i64 = id.parse().map_err(|_| ServerError::NotFound)?;
    app.db
        .with_conn(|conn| db::feedback::delete_feedback(conn, id))?;
    redirect("/admin")
}

pub fn export(app: &App, parts: &Parts) -> ResultResp {
    if !is_admin(app, parts, Utc::now().timestamp())? {
        return redirect(LOGIN_PATH);
    }
    let listings = filtered_listings(app, &query_params(parts))?;
    export_listings_xlsx(&listings)
}
