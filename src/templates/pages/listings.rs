// templates/pages/listings.rs

use crate::domain::filter::SearchQuery;
use crate::domain::listing::Listing;
use crate::domain::pagination::PageItem;
use crate::domain::search::Span;
use crate::templates::{
    components::{listing_card, pagination_nav, search_form},
    desktop_layout,
};
use maud::{html, Markup};

pub struct ListingCardVm {
    pub listing: Listing,
    pub spans: Vec<Span>,
}

pub struct ListingsVm<'a> {
    pub title: &'a str,
    pub base_path: &'a str,
    pub query: &'a SearchQuery,
    pub show_tier_filter: bool,
    pub cards: Vec<ListingCardVm>,
    pub total: usize,
    pub page: usize,
    pub window: Vec<PageItem>,
    pub is_admin: bool,
}

pub fn listings_page(vm: &ListingsVm) -> Markup {
    desktop_layout(
        vm.title,
        vm.is_admin,
        html! {
            main class="container" {
                h1 { (vm.title) }
                (search_form(vm.base_path, vm.query, vm.show_tier_filter))

                p class="result-count" { (vm.total) " numbers found" }

                @if vm.cards.is_empty() {
                    div class="card empty" {
                        p { "No numbers match your search." }
                    }
                } @else {
                    div class="listing-grid" {
                        @for card in &vm.cards {
                            (listing_card(&card.listing, &card.spans))
                        }
                    }
                }

                (pagination_nav(vm.base_path, vm.query, vm.page, &vm.window))
            }
        },
    )
}
