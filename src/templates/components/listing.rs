// templates/components/listing.rs

use crate::domain::listing::{format_price, Listing, Tier};
use crate::domain::phone::{call_link, whatsapp_link};
use crate::domain::search::Span;
use maud::{html, Markup};

/// Display number with the matched run wrapped in `<mark>`.
pub fn phone_spans(spans: &[Span]) -> Markup {
    html! {
        span class="phone" {
            @for span in spans {
                @if span.highlighted {
                    mark { (span.text) }
                } @else {
                    (span.text)
                }
            }
        }
    }
}

pub fn listing_card(listing: &Listing, spans: &[Span]) -> Markup {
    let message = format!("Salam, {} nomresi ile maraqlaniram.", listing.phone_number);

    html! {
        article class=(format!("listing {}", listing.tier.as_str())) {
            (phone_spans(spans))
            p {
                span class="operator" { (listing.operator().name()) }
                @if listing.tier != Tier::Standard {
                    " · " span class="tier" { (listing.tier.as_str().to_uppercase()) }
                }
                @if listing.is_vip {
                    " · VIP"
                }
            }
            p class="price" { strong { (format_price(listing.price)) } }
            @if !listing.description.is_empty() {
                p class="description" { (listing.description) }
            }
            p class="contact" {
                a href=(call_link(&listing.contact_phone)) { "Call" }
                " · "
                a href=(whatsapp_link(&listing.contact_phone, &message)) target="_blank" rel="noopener" { "WhatsApp" }
            }
        }
    }
}
