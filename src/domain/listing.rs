// src/domain/listing.rs

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::phone::{
    digits_only, extract_prefix, format_phone_number, is_known_prefix, operator_for_prefix,
    Operator,
};
use crate::errors::ServerError;

/// Minor units per AZN (1 AZN = 100 qepik).
pub const MINOR_PER_AZN: i64 = 100;
pub const MAX_PRICE_AZN: i64 = 999_999;
pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Gold,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Standard, Tier::Gold, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Gold => "gold",
            Tier::Premium => "premium",
        }
    }

    /// How long a new listing of this tier stays up.
    pub fn duration_days(&self) -> i64 {
        match self {
            Tier::Standard => 7,
            Tier::Gold => 20,
            Tier::Premium => 30,
        }
    }
}

impl FromStr for Tier {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Tier::Standard),
            "gold" => Ok(Tier::Gold),
            "premium" => Ok(Tier::Premium),
            other => Err(ServerError::BadRequest(format!("unknown tier '{other}'"))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Sold,
    Expired,
    Draft,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Sold => "sold",
            ListingStatus::Expired => "expired",
            ListingStatus::Draft => "draft",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ListingStatus::Active),
            "sold" => Ok(ListingStatus::Sold),
            "expired" => Ok(ListingStatus::Expired),
            "draft" => Ok(ListingStatus::Draft),
            other => Err(ServerError::BadRequest(format!("unknown status '{other}'"))),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phone number offered for sale.
///
/// The operator is not a field: it is always derived from `operator_prefix`
/// through [`Listing::operator`], so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    /// Display form, e.g. `055-123-45-67`.
    pub phone_number: String,
    /// Minor units.
    pub price: i64,
    pub contact_phone: String,
    pub tier: Tier,
    pub operator_prefix: String,
    pub status: ListingStatus,
    pub description: String,
    pub is_vip: bool,
    pub is_seller: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn operator(&self) -> Operator {
        operator_for_prefix(&self.operator_prefix)
    }

    /// Creation time in milliseconds; missing timestamps count as the epoch.
    pub fn created_millis(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    /// Active and not past its expiry at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Active && self.expires_at.map_or(true, |exp| exp > now)
    }
}

/// JSON wire shape. Prices stay in minor units.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView<'a> {
    pub id: &'a str,
    pub phone_number: &'a str,
    pub price: i64,
    pub contact_phone: &'a str,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub operator_prefix: &'a str,
    pub operator_name: Operator,
    pub status: ListingStatus,
    pub description: &'a str,
    pub is_vip: bool,
    pub is_seller: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Listing> for ListingView<'a> {
    fn from(l: &'a Listing) -> Self {
        Self {
            id: &l.id,
            phone_number: &l.phone_number,
            price: l.price,
            contact_phone: &l.contact_phone,
            tier: l.tier,
            operator_prefix: &l.operator_prefix,
            operator_name: l.operator(),
            status: l.status,
            description: &l.description,
            is_vip: l.is_vip,
            is_seller: l.is_seller,
            created_at: l.created_at,
            updated_at: l.updated_at,
            expires_at: l.expires_at,
        }
    }
}

/// Parse RFC 3339 or a bare `YYYY-MM-DD` date. Anything else is `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `150000` minor units -> `"1 500 AZN"`. Fractions are shown only when present.
pub fn format_price(minor: i64) -> String {
    let azn = minor / MINOR_PER_AZN;
    let qepik = (minor % MINOR_PER_AZN).abs();

    let digits = azn.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if minor < 0 {
        grouped.insert(0, '-');
    }

    if qepik == 0 {
        format!("{grouped} AZN")
    } else {
        format!("{grouped}.{qepik:02} AZN")
    }
}

/// Convert a whole-AZN form value to minor units. Called once, when a form is parsed.
pub fn parse_price_azn(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|azn| azn.checked_mul(MINOR_PER_AZN))
}

/// Create/edit payload. `price` is in minor units.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default, alias = "type")]
    pub tier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_seller: bool,
    #[serde(default)]
    pub is_vip: bool,
}

/// Input that passed validation, with prefix derived from the number.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedListing {
    pub phone_number: String,
    pub price: i64,
    pub contact_phone: String,
    pub tier: Tier,
    pub operator_prefix: String,
    pub description: String,
    pub is_seller: bool,
    pub is_vip: bool,
}

impl ListingInput {
    /// Check every field and report all problems at once. The listed number is
    /// stored in `050-123-45-67` form whatever separators were typed.
    pub fn validate(&self) -> Result<ValidatedListing, ServerError> {
        let mut errors = Vec::new();

        let phone = self.phone_number.trim();
        let prefix = extract_prefix(phone);
        if phone.is_empty() {
            errors.push("Phone number is required".to_string());
        } else if digits_only(phone).len() < MIN_PHONE_DIGITS {
            errors.push(format!(
                "Phone number must have at least {MIN_PHONE_DIGITS} digits"
            ));
        } else if digits_only(phone).len() > MAX_PHONE_DIGITS {
            errors.push(format!(
                "Phone number must have at most {MAX_PHONE_DIGITS} digits"
            ));
        } else if !is_known_prefix(&prefix) {
            errors.push(format!("Unknown operator prefix '{prefix}'"));
        }

        match self.price {
            None => errors.push("Price is required".to_string()),
            Some(p) if p <= 0 => errors.push("Price must be a positive number".to_string()),
            Some(p) if p > MAX_PRICE_AZN * MINOR_PER_AZN => {
                errors.push(format!("Price must not exceed {MAX_PRICE_AZN} AZN"))
            }
            Some(_) => {}
        }

        let contact = self.contact_phone.trim();
        if contact.is_empty() {
            errors.push("Contact phone is required".to_string());
        } else if digits_only(contact).len() < MIN_PHONE_DIGITS {
            errors.push("Contact phone is too short".to_string());
        }

        let tier = if self.tier.trim().is_empty() {
            errors.push("Tier is required".to_string());
            None
        } else {
            match self.tier.parse::<Tier>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push(format!("Unknown tier '{}'", self.tier.trim()));
                    None
                }
            }
        };

        match (tier, self.price) {
            (Some(tier), Some(price)) if errors.is_empty() => Ok(ValidatedListing {
                phone_number: format_phone_number(phone),
                price,
                contact_phone: contact.to_string(),
                tier,
                operator_prefix: prefix,
                description: self.description.trim().to_string(),
                is_seller: self.is_seller,
                is_vip: self.is_vip,
            }),
            _ => Err(ServerError::Validation(errors)),
        }
    }
}

impl ValidatedListing {
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::days(self.tier.duration_days())
    }
}
