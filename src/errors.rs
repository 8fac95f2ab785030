use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, validation, missing resources) or downstream layers (DB, XLSX).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Field-level messages; nothing was persisted.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Internal Server Error")]
    InternalError,

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Validation(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::DbError(_) | ServerError::InternalError | ServerError::XlsxError(_) => {
                500
            }
        }
    }

    /// Message safe to show to a client. Storage details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "Not Found".to_string(),
            ServerError::BadRequest(msg) => msg.clone(),
            ServerError::Validation(errors) => errors.join(", "),
            ServerError::Unauthorized(msg) => msg.clone(),
            ServerError::DbError(_) | ServerError::InternalError | ServerError::XlsxError(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
        }
    }

    /// Log server-side failures with their full detail.
    pub fn log(&self) {
        match self.status() {
            500 => log::error!("{self}"),
            _ => log::debug!("{self}"),
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
