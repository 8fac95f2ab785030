pub mod errors;
pub mod html;
pub mod json;
pub mod redirect;
pub mod xlsx;

pub use crate::errors::ResultResp;
pub use errors::{html_error_response, json_error_response};
pub use html::{html_response, html_response_with_cookie, html_response_with_status};
pub use json::{json_created, json_ok, json_response};
pub use redirect::{clear_cookie, redirect, redirect_with_cookie, set_cookie};
pub use xlsx::xlsx_response;
