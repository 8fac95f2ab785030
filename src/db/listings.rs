use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::auth::token::generate_token;
use crate::domain::listing::{parse_timestamp, Listing, ListingStatus, Tier, ValidatedListing};
use crate::domain::phone::Operator;
use crate::errors::ServerError;

const LISTING_ID_BYTES: usize = 12;

const SELECT_LISTING: &str = r#"
    select
        id,              -- 0
        phone_number,    -- 1
        price,           -- 2
        contact_phone,   -- 3
        tier,            -- 4
        operator_prefix, -- 5
        status,          -- 6
        description,     -- 7
        is_vip,          -- 8
        is_seller,       -- 9
        created_at,      -- 10
        updated_at,      -- 11
        expires_at       -- 12
    from listings
"#;

/// Storage-level filter; search and prefix matching happen in the filter engine.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub tier: Option<Tier>,
    pub operator: Option<Operator>,
    pub status: Option<ListingStatus>,
    /// Drop listings whose `expires_at` is at or before this instant.
    pub live_at: Option<DateTime<Utc>>,
}

impl ListingFilter {
    /// What the public pages show: active, unexpired listings.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(ListingStatus::Active),
            live_at: Some(now),
            ..Default::default()
        }
    }
}

/// Raw column values; converted to a `Listing` only if every enum parses.
struct ListingRow {
    id: String,
    phone_number: String,
    price: i64,
    contact_phone: String,
    tier: String,
    operator_prefix: String,
    status: String,
    description: String,
    is_vip: bool,
    is_seller: bool,
    created_at: Option<String>,
    updated_at: Option<String>,
    expires_at: Option<String>,
}

impl ListingRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            phone_number: row.get(1)?,
            price: row.get(2)?,
            contact_phone: row.get(3)?,
            tier: row.get(4)?,
            operator_prefix: row.get(5)?,
            status: row.get(6)?,
            description: row.get(7)?,
            is_vip: row.get(8)?,
            is_seller: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
            expires_at: row.get(12)?,
        })
    }

    fn into_listing(self) -> Option<Listing> {
        let tier = match self.tier.parse::<Tier>() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Skipping listing {}: {e}", self.id);
                return None;
            }
        };
        let status = match self.status.parse::<ListingStatus>() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Skipping listing {}: {e}", self.id);
                return None;
            }
        };

        Some(Listing {
            id: self.id,
            phone_number: self.phone_number,
            price: self.price,
            contact_phone: self.contact_phone,
            tier,
            operator_prefix: self.operator_prefix,
            status,
            description: self.description,
            is_vip: self.is_vip,
            is_seller: self.is_seller,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
            expires_at: self.expires_at.as_deref().and_then(parse_timestamp),
        })
    }
}

pub fn list_listings(conn: &Connection, filter: &ListingFilter) -> Result<Vec<Listing>, ServerError> {
    let mut sql = format!("{SELECT_LISTING} where 1 = 1");
    let mut args: Vec<String> = Vec::new();

    if let Some(tier) = filter.tier {
        sql.push_str(" and tier = ?");
        args.push(tier.as_str().to_string());
    }
    if let Some(status) = filter.status {
        sql.push_str(" and status = ?");
        args.push(status.as_str().to_string());
    }
    if let Some(op) = filter.operator {
        let prefixes = op.prefixes();
        if prefixes.is_empty() {
            return Ok(Vec::new());
        }
        let marks = vec!["?"; prefixes.len()].join(", ");
        sql.push_str(&format!(" and operator_prefix in ({marks})"));
        args.extend(prefixes.iter().map(|p| p.to_string()));
    }
    sql.push_str(" order by created_at desc");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(format!("prepare list listings failed: {e}")))?;

    let rows = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), ListingRow::from_row)
        .map_err(|e| ServerError::DbError(format!("list listings failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        let row = row.map_err(|e| ServerError::DbError(format!("read listing row failed: {e}")))?;
        if let Some(listing) = row.into_listing() {
            out.push(listing);
        }
    }

    if let Some(now) = filter.live_at {
        out.retain(|l| l.is_live(now));
    }

    Ok(out)
}

pub fn get_listing(conn: &Connection, id: &str) -> Result<Option<Listing>, ServerError> {
    let row = conn
        .query_row(
            &format!("{SELECT_LISTING} where id = ?"),
            params![id],
            ListingRow::from_row,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("get listing failed: {e}")))?;

    Ok(row.and_then(ListingRow::into_listing))
}

pub fn create_listing(
    conn: &Connection,
    input: &ValidatedListing,
    now: DateTime<Utc>,
) -> Result<Listing, ServerError> {
    let id = generate_token(&mut OsRng, LISTING_ID_BYTES);
    let expires_at = input.expires_at(now);

    conn.execute(
        r#"
        insert into listings (
            id, phone_number, price, contact_phone, tier, operator_prefix,
            status, description, is_vip, is_seller,
            created_at, updated_at, expires_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7, ?8, ?9, ?10, ?10, ?11)
        "#,
        params![
            id,
            input.phone_number,
            input.price,
            input.contact_phone,
            input.tier.as_str(),
            input.operator_prefix,
            input.description,
            input.is_vip,
            input.is_seller,
            now.to_rfc3339(),
            expires_at.to_rfc3339(),
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;

    get_listing(conn, &id)?.ok_or(ServerError::InternalError)
}

/// Full-field replace. Prefix is re-derived by validation; creation and
/// expiry times are kept.
pub fn update_listing(
    conn: &Connection,
    id: &str,
    input: &ValidatedListing,
    now: DateTime<Utc>,
) -> Result<Listing, ServerError> {
    let changed = conn
        .execute(
            r#"
            update listings set
                phone_number = ?2,
                price = ?3,
                contact_phone = ?4,
                tier = ?5,
                operator_prefix = ?6,
                description = ?7,
                is_vip = ?8,
                is_seller = ?9,
                updated_at = ?10
            where id = ?1
            "#,
            params![
                id,
                input.phone_number,
                input.price,
                input.contact_phone,
                input.tier.as_str(),
                input.operator_prefix,
                input.description,
                input.is_vip,
                input.is_seller,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update listing failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    get_listing(conn, id)?.ok_or(ServerError::NotFound)
}

pub fn delete_listing(conn: &Connection, id: &str) -> Result<(), ServerError> {
    let changed = conn
        .execute("delete from listings where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Flip an active listing to sold. Returns false if it was already sold.
pub fn mark_sold(conn: &Connection, id: &str, now: DateTime<Utc>) -> Result<bool, ServerError> {
    let current: Option<String> = conn
        .query_row(
            "select status from listings where id = ?",
            params![id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("load listing status failed: {e}")))?;

    let Some(status) = current else {
        return Err(ServerError::NotFound);
    };
    if status == ListingStatus::Sold.as_str() {
        return Ok(false);
    }

    let changed = conn
        .execute(
            "update listings set status = 'sold', updated_at = ?2 where id = ?1 and status != 'sold'",
            params![id, now.to_rfc3339()],
        )
        .map_err(|e| ServerError::DbError(format!("mark sold failed: {e}")))?;

    Ok(changed == 1)
}

pub fn count_active(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from listings where status = 'active'",
        [],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count active listings failed: {e}")))
}
