// responses/json.rs
use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use serde::Serialize;
use serde_json::{json, Value};

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ResultResp {
    let body = serde_json::to_vec(value)
        .map_err(|e| {
            log::error!("Failed to encode JSON: {e}");
            ServerError::InternalError
        })?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// `{ "success": true, "data": ... }`
pub fn json_ok<T: Serialize>(data: &T) -> ResultResp {
    json_response(200, &json!({ "success": true, "data": data }))
}

pub fn json_created<T: Serialize>(data: &T) -> ResultResp {
    json_response(201, &json!({ "success": true, "data": data }))
}

/// Failure envelope. Validation errors also carry the per-field list.
pub fn envelope_error(err: &ServerError) -> Value {
    match err {
        ServerError::Validation(errors) => json!({
            "success": false,
            "error": "Validation failed",
            "errors": errors,
        }),
        other => json!({
            "success": false,
            "error": other.public_message(),
        }),
    }
}
