use crate::app::App;
use crate::auth::{sessions, SESSION_COOKIE};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "letmein";
pub const CRON_SECRET: &str = "cron-token";

/// A fresh database file using the production schema. Dropping it removes the file.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

pub fn init_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::new(dir.path().join("test.sqlite3"));

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    TestDb { db, _dir: dir }
}

pub struct TestApp {
    pub app: App,
    _dir: TempDir,
}

/// App with admin login and the cron secret enabled, on its own database.
pub fn test_app() -> TestApp {
    let TestDb { db, _dir } = init_test_db();

    let mut config = AppConfig::default();
    config.admin.password = ADMIN_PASSWORD.to_string();
    config.admin.cron_secret = Some(CRON_SECRET.to_string());
    config.search.page_size = 5;

    TestApp {
        app: App { db, config },
        _dir,
    }
}

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// `Cookie` header value for a fresh admin session.
pub fn admin_cookie(app: &App) -> String {
    let token = app
        .db
        .with_conn(|conn| sessions::create_session(conn, now_unix(), 3600))
        .expect("Failed to create session");
    format!("{SESSION_COOKIE}={token}")
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(body).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, cookie, Body::empty())
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = request(Method::POST, uri, cookie, Body::from(form.to_string()));
    req.headers_mut().insert(
        "Content-Type",
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    req
}

pub fn json_request(
    method: Method,
    uri: &str,
    value: &serde_json::Value,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut req = request(method, uri, cookie, Body::from(value.to_string()));
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    req
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).expect("response is not JSON")
}

pub fn header<'r>(resp: &'r Response, name: &str) -> &'r str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
