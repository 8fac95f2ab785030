use crate::db::{self, Database};
use crate::domain::listing::ListingInput;
use crate::domain::statistics::StatisticsAggregator;
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, test_app};
use chrono::Utc;

fn seed(db: &Database, phone: &str, tier: &str) -> String {
    let valid = ListingInput {
        phone_number: phone.into(),
        price: Some(25_000),
        contact_phone: "050-444-44-22".into(),
        tier: tier.into(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    db.with_conn(|conn| db::listings::create_listing(conn, &valid, Utc::now()))
        .unwrap()
        .id
}

#[test]
fn home_page_highlights_search_match() {
    let t = test_app();
    seed(&t.app.db, "055-123-45-67", "gold");
    seed(&t.app.db, "050-999-88-77", "standard");

    let resp = handle(get("/?q=123-45", None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("055-<mark>123-45</mark>-67"), "{body}");
    assert!(!body.contains("050-999-88-77"));
    assert!(body.contains("250 AZN"));
}

#[test]
fn short_query_shows_nothing() {
    let t = test_app();
    seed(&t.app.db, "055-123-45-67", "gold");

    let body = body_string(handle(get("/?q=5", None), &t.app).unwrap());
    assert!(body.contains("No numbers match your search."));
}

#[test]
fn tier_and_operator_pages_scope_results() {
    let t = test_app();
    seed(&t.app.db, "055-123-45-67", "gold");
    seed(&t.app.db, "070-222-33-44", "premium");
    seed(&t.app.db, "099-555-66-77", "standard");

    let gold = body_string(handle(get("/gold", None), &t.app).unwrap());
    assert!(gold.contains("055-123-45-67"));
    assert!(!gold.contains("070-222-33-44"));

    let nar = body_string(handle(get("/numbers/nar-mobile", None), &t.app).unwrap());
    assert!(nar.contains("070-222-33-44"));
    assert!(!nar.contains("055-123-45-67"));

    let bakcell = body_string(handle(get("/numbers/bakcell", None), &t.app).unwrap());
    assert!(bakcell.contains("055-123-45-67"));
    assert!(bakcell.contains("099-555-66-77"));
}

#[test]
fn unknown_operator_page_is_not_found() {
    let t = test_app();
    let err = handle(get("/numbers/vodafone", None), &t.app).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn sold_and_expired_listings_are_hidden() {
    let t = test_app();
    let sold = seed(&t.app.db, "055-111-11-11", "gold");
    let expired = seed(&t.app.db, "055-222-22-22", "gold");
    seed(&t.app.db, "055-333-33-33", "gold");

    t.app
        .db
        .with_conn(|conn| {
            db::listings::mark_sold(conn, &sold, Utc::now())?;
            conn.execute(
                "update listings set expires_at = '2020-01-01T00:00:00+00:00' where id = ?",
                [&expired],
            )
            .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))?;
            Ok(())
        })
        .unwrap();

    let body = body_string(handle(get("/", None), &t.app).unwrap());
    assert!(body.contains("055-333-33-33"));
    assert!(!body.contains("055-111-11-11"));
    assert!(!body.contains("055-222-22-22"));
}

#[test]
fn pages_after_the_first_are_linked() {
    let t = test_app();
    // page_size is 5 in the test config
    for i in 0..7 {
        seed(&t.app.db, &format!("055-100-00-0{i}"), "standard");
    }

    let first = body_string(handle(get("/", None), &t.app).unwrap());
    assert!(first.contains("7 numbers found"));
    assert!(first.contains("href=\"/?page=2\""));

    let second = body_string(handle(get("/?page=2", None), &t.app).unwrap());
    assert_eq!(second.matches("class=\"listing ").count(), 2);
}

#[test]
fn first_visit_sets_cookie_and_counts_once() {
    let t = test_app();
    let stats = StatisticsAggregator::new(&t.app.db);

    let resp = handle(get("/", None), &t.app).unwrap();
    assert!(header(&resp, "Set-Cookie").starts_with("visitor=1"));

    let resp = handle(get("/gold", Some("visitor=1")), &t.app).unwrap();
    assert_eq!(header(&resp, "Set-Cookie"), "");

    let now = Utc::now();
    assert_eq!(stats.snapshot(now).total_visitors, 1);
    let month = stats.current_month(now);
    assert_eq!(month.visitors, 1);
    assert_eq!(month.page_views, 2);
}

#[test]
fn unknown_page_is_not_found() {
    let t = test_app();
    let err = handle(get("/nowhere", None), &t.app).unwrap_err();
    assert!(matches!(err, crate::errors::ServerError::NotFound));
}

#[test]
fn storage_failure_renders_generic_message() {
    let t = test_app();
    t.app
        .db
        .with_conn(|conn| {
            conn.execute_batch("drop table listings;")
                .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))
        })
        .unwrap();

    let err = handle(get("/", None), &t.app).unwrap_err();
    assert_eq!(err.status(), 500);

    let body = body_string(crate::responses::html_error_response(err));
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("no such table"));
}

#[test]
fn numbers_are_grouped_and_contact_links_dial_internationally() {
    let t = test_app();
    seed(&t.app.db, "(055) 123 4567", "gold");

    let body = body_string(handle(get("/", None), &t.app).unwrap());
    assert!(body.contains("055-123-45-67"));
    assert!(body.contains("tel:+994504444422"));
    assert!(body.contains("https://wa.me/994504444422?text="));
    assert!(!body.contains("9940504444422"));
}
