// src/domain/phone.rs

use serde::{Serialize, Serializer};
use std::fmt;

/// Every operator prefix a listing may carry.
pub const PHONE_PREFIXES: [&str; 8] = ["010", "050", "051", "055", "060", "070", "077", "099"];

/// Country code prepended for call and WhatsApp links.
const COUNTRY_CODE: &str = "994";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Azercell,
    Bakcell,
    Naxtel,
    NarMobile,
    /// Prefix outside the allow-list. Rendered with a fallback icon.
    Unknown,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Azercell,
        Operator::Bakcell,
        Operator::Naxtel,
        Operator::NarMobile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Azercell => "Azercell",
            Operator::Bakcell => "Bakcell",
            Operator::Naxtel => "Naxtel",
            Operator::NarMobile => "Nar Mobile",
            Operator::Unknown => "Unknown",
        }
    }

    /// URL segment used by the operator pages, e.g. `/numbers/nar-mobile`.
    pub fn slug(&self) -> &'static str {
        match self {
            Operator::Azercell => "azercell",
            Operator::Bakcell => "bakcell",
            Operator::Naxtel => "naxtel",
            Operator::NarMobile => "nar-mobile",
            Operator::Unknown => "unknown",
        }
    }

    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Operator::Azercell => &["010", "050", "051"],
            Operator::Bakcell => &["055", "099"],
            Operator::Naxtel => &["060"],
            Operator::NarMobile => &["070", "077"],
            Operator::Unknown => &[],
        }
    }

    /// Accepts slugs and names in any casing: `nar-mobile`, `NAR_MOBILE`, `Nar Mobile`.
    pub fn parse(value: &str) -> Option<Operator> {
        let wanted = normalize_operator_name(value);
        Operator::ALL
            .into_iter()
            .find(|op| normalize_operator_name(op.name()) == wanted)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Remove every character that is not an ASCII digit.
pub fn digits_only(display: &str) -> String {
    display.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// First three digits of the number, or fewer if the number is that short.
pub fn extract_prefix(display: &str) -> String {
    digits_only(display).chars().take(3).collect()
}

pub fn operator_for_prefix(prefix: &str) -> Operator {
    match prefix {
        "010" | "050" | "051" => Operator::Azercell,
        "055" | "099" => Operator::Bakcell,
        "060" => Operator::Naxtel,
        "070" | "077" => Operator::NarMobile,
        _ => Operator::Unknown,
    }
}

pub fn is_known_prefix(prefix: &str) -> bool {
    PHONE_PREFIXES.contains(&prefix)
}

/// Canonical form for operator comparisons: `_`, `-` and spaces are
/// interchangeable and every word is capitalized.
pub fn normalize_operator_name(value: &str) -> String {
    value
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group digits as `050-123-45-67`. Digits past the tenth are dropped and a
/// trailing dash marks a group still being typed (`055-`, `055-123-`).
pub fn format_phone_number(raw: &str) -> String {
    let digits = digits_only(raw);
    let d = &digits[..digits.len().min(10)];

    match d.len() {
        0..=2 => d.to_string(),
        3..=5 => format!("{}-{}", &d[..3], &d[3..]),
        6..=7 => format!("{}-{}-{}", &d[..3], &d[3..6], &d[6..]),
        _ => format!("{}-{}-{}-{}", &d[..3], &d[3..6], &d[6..8], &d[8..]),
    }
}

/// Subscriber digits without the trunk `0` or an existing `994` country code.
fn international_digits(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => digits
            .strip_prefix(COUNTRY_CODE)
            .map(str::to_string)
            .unwrap_or(digits),
    }
}

pub fn call_link(phone: &str) -> String {
    format!("tel:+{COUNTRY_CODE}{}", international_digits(phone))
}

pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let text: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    format!(
        "https://wa.me/{COUNTRY_CODE}{}?text={text}",
        international_digits(phone)
    )
}
