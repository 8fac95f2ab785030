use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Error page body. `message` must already be safe to show.
pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        &format!("Error {status}"),
        false,
        html! {
            main class="container" {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Back to all numbers" } }
            }
        },
    )
}
