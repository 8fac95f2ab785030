// src/domain/search.rs

// Matching looks only at digits. Highlighting walks the display string.

use serde::Serialize;

use crate::domain::phone::digits_only;

/// Length of the operator code dropped for prefixless matching.
const PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRules {
    /// Fewer digits than this and nothing matches.
    pub min_search_digits: usize,
    /// At least this many digits and only a whole-number match counts.
    pub exact_match_digits: usize,
}

impl Default for SearchRules {
    fn default() -> Self {
        Self {
            min_search_digits: 2,
            exact_match_digits: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub matched: bool,
    pub spans: Vec<Span>,
}

impl MatchResult {
    fn no_match(display: &str) -> Self {
        Self {
            matched: false,
            spans: vec![Span {
                text: display.to_string(),
                highlighted: false,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchMatcher {
    rules: SearchRules,
}

impl SearchMatcher {
    pub fn new(rules: SearchRules) -> Self {
        Self { rules }
    }

    pub fn match_phone(&self, display: &str, raw_search: &str) -> MatchResult {
        if raw_search.trim().is_empty() {
            return MatchResult::no_match(display);
        }

        let search = digits_only(raw_search);
        if search.len() < self.rules.min_search_digits {
            return MatchResult::no_match(display);
        }

        let phone = digits_only(display);
        let without_prefix = phone.get(PREFIX_LEN..).unwrap_or("");

        if search.len() >= self.rules.exact_match_digits
            && phone != search
            && without_prefix != search
        {
            return MatchResult::no_match(display);
        }

        let digit_start = match phone.find(&search) {
            Some(idx) => idx,
            None => match without_prefix.find(&search) {
                Some(idx) => idx + PREFIX_LEN,
                None => return MatchResult::no_match(display),
            },
        };

        match display_range(display, digit_start, search.len()) {
            Some((start, end)) => MatchResult {
                matched: true,
                spans: split_spans(display, start, end),
            },
            None => MatchResult::no_match(display),
        }
    }
}

/// Match with the default thresholds.
pub fn match_phone(display: &str, raw_search: &str) -> MatchResult {
    SearchMatcher::default().match_phone(display, raw_search)
}

/// Map a run of `len` digits starting at digit index `digit_start` onto byte
/// offsets of `display`. The range starts at the first digit and ends right
/// after the last one.
fn display_range(display: &str, digit_start: usize, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let digit_last = digit_start + len - 1;

    let mut digit_idx = 0;
    let mut start = None;

    for (byte_idx, ch) in display.char_indices() {
        if !ch.is_ascii_digit() {
            continue;
        }
        if digit_idx == digit_start {
            start = Some(byte_idx);
        }
        if digit_idx == digit_last {
            return start.map(|s| (s, byte_idx + ch.len_utf8()));
        }
        digit_idx += 1;
    }

    None
}

fn split_spans(display: &str, start: usize, end: usize) -> Vec<Span> {
    let mut spans = Vec::with_capacity(3);
    if start > 0 {
        spans.push(Span {
            text: display[..start].to_string(),
            highlighted: false,
        });
    }
    spans.push(Span {
        text: display[start..end].to_string(),
        highlighted: true,
    });
    if end < display.len() {
        spans.push(Span {
            text: display[end..].to_string(),
            highlighted: false,
        });
    }
    spans
}
