use crate::router::handle;
use crate::tests::utils::{admin_cookie, body_json, body_string, get, json_request, post_form, test_app};
use http::Method;
use serde_json::json;

#[test]
fn feedback_form_renders() {
    let t = test_app();
    let resp = handle(get("/feedback", None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("name=\"message\""));
}

#[test]
fn valid_form_is_stored() {
    let t = test_app();
    let form = "name=Leyla&email=leyla%40example.az&rating=4&type=suggestion\
                &subject=Filters&message=Please+add+a+price+filter";

    let resp = handle(post_form("/feedback", form, None), &t.app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Thank you"));

    let cookie = admin_cookie(&t.app);
    let listed = body_json(handle(get("/api/feedback", Some(&cookie)), &t.app).unwrap());
    assert_eq!(listed["data"][0]["name"], "Leyla");
    assert_eq!(listed["data"][0]["type"], "suggestion");
    assert_eq!(listed["data"][0]["rating"], 4);
}

#[test]
fn invalid_form_shows_messages_and_keeps_input() {
    let t = test_app();
    let form = "name=L&email=nope&rating=9&type=suggestion&subject=&message=short";

    let resp = handle(post_form("/feedback", form, None), &t.app).unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Rating must be between 1 and 5"));
    assert!(body.contains("A valid email address is required"));
    assert!(body.contains("value=\"nope\""));
}

#[test]
fn api_submission_and_admin_listing() {
    let t = test_app();
    let payload = json!({
        "name": "Elvin",
        "email": "elvin@example.az",
        "rating": 5,
        "type": "praise",
        "subject": "Thanks",
        "message": "Bought a premium number, smooth process.",
    });

    let resp = handle(json_request(Method::POST, "/api/feedback", &payload, None), &t.app).unwrap();
    assert_eq!(resp.status(), 201);

    let resp = handle(get("/api/feedback", None), &t.app).unwrap();
    assert_eq!(resp.status(), 401);

    let cookie = admin_cookie(&t.app);
    let listed = body_json(handle(get("/api/feedback", Some(&cookie)), &t.app).unwrap());
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[test]
fn api_validation_errors() {
    let t = test_app();
    let resp = handle(
        json_request(Method::POST, "/api/feedback", &json!({ "rating": 0 }), None),
        &t.app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_json(resp)["errors"].as_array().unwrap().len() >= 5);
}
