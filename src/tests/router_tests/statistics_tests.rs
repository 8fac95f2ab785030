use crate::domain::statistics::month_key;
use crate::router::handle;
use crate::tests::utils::{admin_cookie, body_json, get, json_request, request, test_app, CRON_SECRET};
use astra::Body;
use chrono::Utc;
use http::Method;
use serde_json::json;

#[test]
fn statistics_start_at_zero() {
    let t = test_app();
    let resp = handle(get("/api/statistics", None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalVisitors"], 0);
    assert_eq!(body["data"]["totalSold"], 0);
    assert_eq!(body["data"]["totalListings"], 0);
}

#[test]
fn post_actions_increment_counters() {
    let t = test_app();
    for action in ["increment_visitor", "increment_visitor", "increment_sold"] {
        let resp = handle(
            json_request(Method::POST, "/api/statistics", &json!({ "action": action }), None),
            &t.app,
        )
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(resp)["recorded"], true);
    }

    let body = body_json(handle(get("/api/statistics", None), &t.app).unwrap());
    assert_eq!(body["data"]["totalVisitors"], 2);
    assert_eq!(body["data"]["todayVisitors"], 2);
    assert_eq!(body["data"]["totalSold"], 1);
}

#[test]
fn unknown_action_is_bad_request() {
    let t = test_app();
    let resp = handle(
        json_request(Method::POST, "/api/statistics", &json!({ "action": "explode" }), None),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = handle(
        request(Method::POST, "/api/statistics", None, Body::from("not json")),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);
}

#[test]
fn monthly_counts_visitors_and_page_views() {
    let t = test_app();
    for action in ["increment_visitor", "increment_pageview", "increment_pageview"] {
        handle(
            json_request(
                Method::POST,
                "/api/statistics/monthly",
                &json!({ "action": action }),
                None,
            ),
            &t.app,
        )
        .unwrap();
    }

    let body = body_json(handle(get("/api/statistics/monthly", None), &t.app).unwrap());
    assert_eq!(body["data"]["month"], month_key(Utc::now().timestamp()));
    assert_eq!(body["data"]["visitors"], 1);
    assert_eq!(body["data"]["pageViews"], 2);

    let empty = body_json(handle(get("/api/statistics/monthly?month=2001-02", None), &t.app).unwrap());
    assert_eq!(empty["data"]["month"], "2001-02");
    assert_eq!(empty["data"]["visitors"], 0);

    let resp = handle(get("/api/statistics/monthly?month=2001-13", None), &t.app).unwrap();
    assert_eq!(resp.status(), 400);
}

#[test]
fn reset_month_needs_admin_and_is_idempotent() {
    let t = test_app();
    handle(
        json_request(
            Method::POST,
            "/api/statistics/monthly",
            &json!({ "action": "increment_visitor" }),
            None,
        ),
        &t.app,
    )
    .unwrap();

    let reset = json!({ "action": "reset_month" });
    let resp = handle(
        json_request(Method::POST, "/api/statistics/monthly", &reset, None),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 401);

    let cookie = admin_cookie(&t.app);
    for _ in 0..2 {
        let resp = handle(
            json_request(Method::POST, "/api/statistics/monthly", &reset, Some(&cookie)),
            &t.app,
        )
        .unwrap();
        assert_eq!(resp.status(), 200);
        let body = body_json(resp);
        assert_eq!(body["data"]["visitors"], 0);
        assert_eq!(body["data"]["pageViews"], 0);
    }

    // Global totals survive a monthly reset.
    let body = body_json(handle(get("/api/statistics", None), &t.app).unwrap());
    assert_eq!(body["data"]["totalVisitors"], 1);
}

#[test]
fn cron_reset_accepts_bearer_secret_only() {
    let t = test_app();

    let resp = handle(get("/api/cron/reset-monthly-stats", None), &t.app).unwrap();
    assert_eq!(resp.status(), 401);

    let mut req = get("/api/cron/reset-monthly-stats", None);
    req.headers_mut()
        .insert("Authorization", "Bearer wrong".parse().unwrap());
    assert_eq!(handle(req, &t.app).unwrap().status(), 401);

    let mut req = get("/api/cron/reset-monthly-stats", None);
    req.headers_mut().insert(
        "Authorization",
        format!("Bearer {CRON_SECRET}").parse().unwrap(),
    );
    let resp = handle(req, &t.app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["currentMonth"]["month"],
        month_key(Utc::now().timestamp())
    );
    assert!(body["data"]["previousMonth"].is_null());
}
