// src/handlers/mod.rs

pub mod admin;
pub mod api;
pub mod pages;

use std::collections::HashMap;
use std::io::Read;

use astra::Body;
use http::request::Parts;

use crate::app::App;
use crate::auth::{sessions, SESSION_COOKIE};
use crate::domain::filter::SearchQuery;
use crate::errors::ServerError;

/// Larger request bodies are cut off; no form or payload here comes close.
const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn query_params(parts: &Parts) -> HashMap<String, String> {
    parts
        .uri
        .query()
        .map(|q| parse_pairs(q.as_bytes()))
        .unwrap_or_default()
}

/// `application/x-www-form-urlencoded` pairs. Later keys win.
pub fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

pub fn read_body(mut body: Body) -> Result<String, ServerError> {
    let mut buf = String::new();
    body.reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Could not read request body: {e}")))?;
    Ok(buf)
}

pub fn read_form(body: Body) -> Result<HashMap<String, String>, ServerError> {
    Ok(parse_pairs(read_body(body)?.as_bytes()))
}

pub fn read_json<T: serde::de::DeserializeOwned>(body: Body) -> Result<T, ServerError> {
    let raw = read_body(body)?;
    serde_json::from_str(&raw).map_err(|e| ServerError::BadRequest(format!("Invalid JSON: {e}")))
}

pub fn cookie(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// True when the request carries a live admin session cookie.
pub fn is_admin(app: &App, parts: &Parts, now: i64) -> Result<bool, ServerError> {
    let Some(token) = cookie(parts, SESSION_COOKIE) else {
        return Ok(false);
    };
    if token.is_empty() {
        return Ok(false);
    }
    app.db
        .with_conn(|conn| sessions::is_valid_session(conn, &token, now))
}

/// `q`, `prefix` and `type` from a parameter map.
pub fn search_query(params: &HashMap<String, String>) -> SearchQuery {
    let get = |k: &str| params.get(k).map(|v| v.trim().to_string()).unwrap_or_default();
    SearchQuery {
        search_term: get("q"),
        selected_prefix: get("prefix"),
        selected_tier: get("type").to_lowercase(),
        operator_scope: None,
    }
}

/// 1-based page number; anything unparsable is page 1.
pub fn page_param(params: &HashMap<String, String>) -> usize {
    params
        .get("page")
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
