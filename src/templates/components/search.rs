use crate::domain::filter::SearchQuery;
use crate::domain::listing::Tier;
use crate::domain::pagination::PageItem;
use crate::domain::phone::PHONE_PREFIXES;
use maud::{html, Markup};

/// Search box plus prefix and tier selects. `show_tier` is off on tier pages.
pub fn search_form(action: &str, query: &SearchQuery, show_tier: bool) -> Markup {
    html! {
        form method="get" action=(action) class="card search" {
            input type="search" name="q" value=(query.search_term) placeholder="055-123-45-67";
            select name="prefix" {
                option value="" { "All prefixes" }
                @for prefix in PHONE_PREFIXES {
                    option value=(prefix) selected[query.selected_prefix == prefix] { (prefix) }
                }
            }
            @if show_tier {
                select name="type" {
                    option value="" { "All types" }
                    @for tier in Tier::ALL {
                        option value=(tier.as_str()) selected[query.selected_tier == tier.as_str()] { (tier.as_str()) }
                    }
                }
            }
            button type="submit" { "Search" }
        }
    }
}

/// Page links that keep the current search parameters.
pub fn pagination_nav(
    base_path: &str,
    query: &SearchQuery,
    current: usize,
    window: &[PageItem],
) -> Markup {
    html! {
        @if window.len() > 1 {
            nav class="pagination" {
                @for item in window {
                    @match item {
                        PageItem::Page(n) if *n == current => {
                            span class="current" { (n) }
                        }
                        PageItem::Page(n) => {
                            a href=(page_href(base_path, query, *n)) { (n) }
                        }
                        PageItem::Ellipsis => {
                            span { (item) }
                        }
                    }
                }
            }
        }
    }
}

pub fn page_href(base_path: &str, query: &SearchQuery, page: usize) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    if !query.search_term.trim().is_empty() {
        params.append_pair("q", &query.search_term);
    }
    if !query.selected_prefix.is_empty() {
        params.append_pair("prefix", &query.selected_prefix);
    }
    if !query.selected_tier.is_empty() {
        params.append_pair("type", &query.selected_tier);
    }
    params.append_pair("page", &page.to_string());
    format!("{base_path}?{}", params.finish())
}
