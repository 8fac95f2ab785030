use maud::{html, Markup};

pub mod error;
pub mod listing;
pub mod search;

pub use error::error_page;
pub use listing::{listing_card, phone_spans};
pub use search::{pagination_nav, search_form};

/// Inline validation messages. Renders nothing for an empty list.
pub fn error_list(errors: &[String]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul class="errors" {
                @for e in errors {
                    li { (e) }
                }
            }
        }
    }
}
