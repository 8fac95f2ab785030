// src/domain/filter.rs

use std::cmp::Ordering;

use crate::domain::listing::Listing;
use crate::domain::phone::normalize_operator_name;
use crate::domain::search::{SearchMatcher, SearchRules};

/// Caller-supplied search context. Empty strings mean "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub search_term: String,
    pub selected_prefix: String,
    pub selected_tier: String,
    /// Set by operator pages, e.g. `nar-mobile`.
    pub operator_scope: Option<String>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.selected_prefix.is_empty()
            && self.selected_tier.is_empty()
            && self.operator_scope.is_none()
    }
}

pub type Predicate<'a> = Box<dyn Fn(&Listing) -> bool + 'a>;

pub fn has_display_phone(listing: &Listing) -> bool {
    !listing.phone_number.trim().is_empty()
}

pub fn in_operator_scope(listing: &Listing, scope: &str) -> bool {
    normalize_operator_name(listing.operator().name()) == normalize_operator_name(scope)
}

pub fn has_tier(listing: &Listing, tier: &str) -> bool {
    listing.tier.as_str() == tier
}

pub fn has_prefix(listing: &Listing, prefix: &str) -> bool {
    listing.operator_prefix == prefix
}

/// Newest first; equal timestamps put the higher price first.
pub fn compare_listings(a: &Listing, b: &Listing) -> Ordering {
    b.created_millis()
        .cmp(&a.created_millis())
        .then_with(|| b.price.cmp(&a.price))
}

/// Stable: listings with identical keys keep their input order.
pub fn sort_listings(listings: &mut [Listing]) {
    listings.sort_by(compare_listings);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    matcher: SearchMatcher,
}

impl FilterEngine {
    pub fn new(rules: SearchRules) -> Self {
        Self {
            matcher: SearchMatcher::new(rules),
        }
    }

    pub fn matcher(&self) -> &SearchMatcher {
        &self.matcher
    }

    /// Predicates for `query`, in evaluation order. Unselected criteria are
    /// simply absent from the list.
    pub fn predicates<'q>(&'q self, query: &'q SearchQuery) -> Vec<Predicate<'q>> {
        let mut predicates: Vec<Predicate<'q>> = Vec::new();
        predicates.push(Box::new(has_display_phone));

        if let Some(scope) = query.operator_scope.as_deref() {
            predicates.push(Box::new(move |l: &Listing| in_operator_scope(l, scope)));
        }
        if !query.selected_tier.is_empty() {
            predicates.push(Box::new(move |l: &Listing| has_tier(l, &query.selected_tier)));
        }
        if !query.selected_prefix.is_empty() {
            predicates.push(Box::new(move |l: &Listing| has_prefix(l, &query.selected_prefix)));
        }
        if !query.search_term.trim().is_empty() {
            predicates.push(Box::new(move |l: &Listing| {
                self.matcher
                    .match_phone(&l.phone_number, &query.search_term)
                    .matched
            }));
        }

        predicates
    }

    /// Listings passing every predicate, sorted. The input is left untouched.
    pub fn filter(&self, listings: &[Listing], query: &SearchQuery) -> Vec<Listing> {
        let predicates = self.predicates(query);
        let mut out: Vec<Listing> = listings
            .iter()
            .filter(|l| predicates.iter().all(|p| p(*l)))
            .cloned()
            .collect();
        sort_listings(&mut out);
        out
    }
}
