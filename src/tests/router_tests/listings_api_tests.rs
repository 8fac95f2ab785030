use crate::router::handle;
use crate::tests::utils::{admin_cookie, body_json, get, json_request, test_app};
use http::Method;
use serde_json::json;

fn listing_json(phone: &str, tier: &str, price: i64) -> serde_json::Value {
    json!({
        "phoneNumber": phone,
        "price": price,
        "contactPhone": "050-444-44-22",
        "type": tier,
        "description": "Easy to remember",
        "isSeller": true,
    })
}

#[test]
fn create_requires_admin_session() {
    let t = test_app();
    let req = json_request(
        Method::POST,
        "/api/listings",
        &listing_json("055-123-45-67", "gold", 15_000),
        None,
    );

    let resp = handle(req, &t.app).expect("api errors are rendered as JSON");
    assert_eq!(resp.status(), 401);

    let body = body_json(resp);
    assert_eq!(body["success"], false);
}

#[test]
fn create_then_list_keeps_minor_units() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let req = json_request(
        Method::POST,
        "/api/listings",
        &listing_json("055-123-45-67", "gold", 15_000),
        Some(&cookie),
    );
    let resp = handle(req, &t.app).unwrap();
    assert_eq!(resp.status(), 201);

    let created = body_json(resp);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["price"], 15_000);
    assert_eq!(created["data"]["operatorPrefix"], "055");
    assert_eq!(created["data"]["operatorName"], "Bakcell");
    assert_eq!(created["data"]["type"], "gold");
    assert_eq!(created["data"]["status"], "active");

    let listed = body_json(handle(get("/api/listings", None), &t.app).unwrap());
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["price"], 15_000);
    assert_eq!(listed["pagination"]["total"], 1);
    assert_eq!(listed["pagination"]["hasMore"], false);
}

#[test]
fn validation_errors_are_listed_and_nothing_is_stored() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let bad = json!({ "phoneNumber": "123", "price": 0, "contactPhone": "", "type": "platinum" });
    let resp = handle(
        json_request(Method::POST, "/api/listings", &bad, Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_json(resp);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);

    let listed = body_json(handle(get("/api/listings", None), &t.app).unwrap());
    assert_eq!(listed["pagination"]["total"], 0);
}

#[test]
fn list_filters_and_paginates() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let seed = [
        ("055-111-11-11", "gold"),
        ("055-222-22-22", "gold"),
        ("050-333-33-33", "gold"),
        ("070-444-44-44", "premium"),
        ("099-555-55-55", "standard"),
        ("055-666-66-66", "standard"),
    ];
    for (phone, tier) in seed {
        let resp = handle(
            json_request(
                Method::POST,
                "/api/listings",
                &listing_json(phone, tier, 10_000),
                Some(&cookie),
            ),
            &t.app,
        )
        .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let gold = body_json(handle(get("/api/listings?type=gold", None), &t.app).unwrap());
    assert_eq!(gold["pagination"]["total"], 3);

    let bakcell = body_json(handle(get("/api/listings?operator=bakcell", None), &t.app).unwrap());
    assert_eq!(bakcell["pagination"]["total"], 4);

    let page = body_json(handle(get("/api/listings?limit=2&offset=2", None), &t.app).unwrap());
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["limit"], 2);
    assert_eq!(page["pagination"]["offset"], 2);
    assert_eq!(page["pagination"]["hasMore"], true);

    let searched = body_json(handle(get("/api/listings?q=333-33", None), &t.app).unwrap());
    assert_eq!(searched["pagination"]["total"], 1);
    assert_eq!(searched["data"][0]["phoneNumber"], "050-333-33-33");
}

#[test]
fn bad_filters_are_rejected() {
    let t = test_app();
    for uri in [
        "/api/listings?type=platinum",
        "/api/listings?status=lost",
        "/api/listings?operator=vodafone",
        "/api/listings?limit=many",
    ] {
        let resp = handle(get(uri, None), &t.app).unwrap();
        assert_eq!(resp.status(), 400, "{uri}");
    }
}

#[test]
fn update_and_delete_unknown_id_are_404() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let resp = handle(
        json_request(
            Method::PUT,
            "/api/listings/missing",
            &listing_json("055-123-45-67", "gold", 100),
            Some(&cookie),
        ),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = handle(
        json_request(Method::DELETE, "/api/listings/missing", &json!({}), Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["error"], "Not Found");
}

#[test]
fn update_replaces_fields_and_delete_removes() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let created = body_json(
        handle(
            json_request(
                Method::POST,
                "/api/listings",
                &listing_json("055-123-45-67", "gold", 100),
                Some(&cookie),
            ),
            &t.app,
        )
        .unwrap(),
    );
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let updated = body_json(
        handle(
            json_request(
                Method::PUT,
                &format!("/api/listings/{id}"),
                &listing_json("077-765-43-21", "premium", 50_000),
                Some(&cookie),
            ),
            &t.app,
        )
        .unwrap(),
    );
    assert_eq!(updated["data"]["operatorName"], "Nar Mobile");
    assert_eq!(updated["data"]["price"], 50_000);
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let resp = handle(
        json_request(Method::DELETE, &format!("/api/listings/{id}"), &json!({}), Some(&cookie)),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = handle(get(&format!("/api/listings/{id}"), None), &t.app).unwrap();
    assert_eq!(resp.status(), 404);
}

#[test]
fn unknown_api_route_is_json_404() {
    let t = test_app();
    let resp = handle(get("/api/nothing", None), &t.app).unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["success"], false);
}

#[test]
fn phone_number_is_stored_in_grouped_form() {
    let t = test_app();
    let cookie = admin_cookie(&t.app);

    let created = body_json(
        handle(
            json_request(
                Method::POST,
                "/api/listings",
                &listing_json("070 765 4321", "standard", 5_000),
                Some(&cookie),
            ),
            &t.app,
        )
        .unwrap(),
    );
    assert_eq!(created["data"]["phoneNumber"], "070-765-43-21");

    let resp = handle(
        json_request(
            Method::POST,
            "/api/listings",
            &listing_json("070-765-43-21-99", "standard", 5_000),
            Some(&cookie),
        ),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);
}
