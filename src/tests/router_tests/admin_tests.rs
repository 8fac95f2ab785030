use crate::db::{self, ListingFilter};
use crate::domain::listing::{ListingStatus, Tier};
use crate::domain::statistics::StatisticsAggregator;
use crate::router::handle;
use crate::tests::utils::{
    admin_cookie, body_string, get, header, post_form, test_app, ADMIN_PASSWORD,
};
use chrono::Utc;

const NEW_LISTING_FORM: &str =
    "phone_number=055-123-45-67&price=150&contact_phone=050-444-44-22&type=gold&is_vip=1";

#[test]
fn dashboard_redirects_without_session() {
    let t = test_app();
    let resp = handle(get("/admin", None), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/admin/login");
}

#[test]
fn wrong_password_is_rejected() {
    let t = test_app();
    let resp = handle(post_form("/admin/login", "password=guess", None), &t.app).unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(header(&resp, "Set-Cookie"), "");
    assert!(body_string(resp).contains("Wrong password"));
}

#[test]
fn login_sets_session_cookie_and_logout_revokes_it() {
    let t = test_app();
    let resp = handle(
        post_form("/admin/login", &format!("password={ADMIN_PASSWORD}"), None),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/admin");

    let set_cookie = header(&resp, "Set-Cookie").to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("admin_session="));

    let resp = handle(get("/admin", Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Admin Dashboard"));

    let resp = handle(post_form("/admin/logout", "", Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 302);

    let resp = handle(get("/admin", Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 302, "revoked session must not work");
}

#[test]
fn form_price_is_converted_once() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let resp = handle(post_form("/admin/listings", NEW_LISTING_FORM, Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 302);

    let listings = t
        .app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &ListingFilter::default()))
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].price, 15_000);
    assert_eq!(listings[0].tier, Tier::Gold);
    assert!(listings[0].is_vip);
    assert!(!listings[0].is_seller);

    let body = body_string(handle(get("/admin", Some(&cookie)), &t.app).unwrap());
    assert!(body.contains("150 AZN"));
}

#[test]
fn invalid_form_rerenders_with_errors() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let form = "phone_number=012-000-00-00&price=abc&contact_phone=050-444-44-22&type=gold";
    let resp = handle(post_form("/admin/listings", form, Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Unknown operator prefix"));
    assert!(body.contains("Price is required"));
    assert!(body.contains("value=\"012-000-00-00\""));
}

#[test]
fn edit_form_is_prefilled_and_saves() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);
    handle(post_form("/admin/listings", NEW_LISTING_FORM, Some(&cookie)), &t.app).unwrap();

    let id = t
        .app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &ListingFilter::default()))
        .unwrap()[0]
        .id
        .clone();

    let body = body_string(handle(get(&format!("/admin?edit={id}"), Some(&cookie)), &t.app).unwrap());
    assert!(body.contains(&format!("action=\"/admin/listings/{id}\"")));
    assert!(body.contains("value=\"150\""));

    let form = "phone_number=099-123-45-67&price=200&contact_phone=050-444-44-22&type=premium";
    let resp = handle(
        post_form(&format!("/admin/listings/{id}"), form, Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let updated = t
        .app
        .db
        .with_conn(|conn| db::listings::get_listing(conn, &id))
        .unwrap()
        .unwrap();
    assert_eq!(updated.price, 20_000);
    assert_eq!(updated.operator_prefix, "099");
    assert_eq!(updated.tier, Tier::Premium);
}

#[test]
fn mark_sold_counts_once() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);
    handle(post_form("/admin/listings", NEW_LISTING_FORM, Some(&cookie)), &t.app).unwrap();

    let id = t
        .app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &ListingFilter::default()))
        .unwrap()[0]
        .id
        .clone();

    for _ in 0..2 {
        let resp = handle(
            post_form(&format!("/admin/listings/{id}/sold"), "", Some(&cookie)),
            &t.app,
        )
        .unwrap();
        assert_eq!(resp.status(), 302);
    }

    let listing = t
        .app
        .db
        .with_conn(|conn| db::listings::get_listing(conn, &id))
        .unwrap()
        .unwrap();
    assert_eq!(listing.status, ListingStatus::Sold);

    let stats = StatisticsAggregator::new(&t.app.db).snapshot(Utc::now());
    assert_eq!(stats.total_sold, 1);
    assert_eq!(stats.total_listings, 0);
}

#[test]
fn delete_listing_and_unknown_id() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);
    handle(post_form("/admin/listings", NEW_LISTING_FORM, Some(&cookie)), &t.app).unwrap();

    let id = t
        .app
        .db
        .with_conn(|conn| db::listings::list_listings(conn, &ListingFilter::default()))
        .unwrap()[0]
        .id
        .clone();

    let resp = handle(
        post_form(&format!("/admin/listings/{id}/delete"), "", Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let err = handle(
        post_form(&format!("/admin/listings/{id}/delete"), "", Some(&cookie)),
        &t.app,
    )
    .unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn export_returns_spreadsheet() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);
    handle(post_form("/admin/listings", NEW_LISTING_FORM, Some(&cookie)), &t.app).unwrap();

    let resp = handle(get("/admin/export?prefix=055", Some(&cookie)), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(header(&resp, "Content-Disposition").contains("phone_numbers.xlsx"));
}

#[test]
fn feedback_can_be_deleted() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);
    let form = "name=Leyla&email=leyla%40example.az&rating=4&type=other\
                &subject=Hello&message=Just+saying+hello+there";
    handle(post_form("/feedback", form, None), &t.app).unwrap();

    let feedback = t
        .app
        .db
        .with_conn(|conn| db::feedback::list_feedback(conn))
        .unwrap();
    let id = feedback[0].id;

    let resp = handle(
        post_form(&format!("/admin/feedback/{id}/delete"), "", Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let remaining = t
        .app
        .db
        .with_conn(|conn| db::feedback::list_feedback(conn))
        .unwrap();
    assert!(remaining.is_empty());
}
