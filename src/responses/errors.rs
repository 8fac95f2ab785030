use crate::errors::ServerError;
use crate::responses::json::envelope_error;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

/// Render a ServerError as an HTML page. Storage details are logged, not shown.
pub fn html_error_response(err: ServerError) -> Response {
    err.log();
    let status = err.status();
    let body = error_page(status, &err.public_message()).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| fallback(status))
}

/// Render a ServerError as `{ success: false, error, errors? }`.
pub fn json_error_response(err: ServerError) -> Response {
    err.log();
    let status = err.status();
    let body = envelope_error(&err).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| fallback(status))
}

fn fallback(status: u16) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = http::StatusCode::from_u16(status)
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
    resp
}
