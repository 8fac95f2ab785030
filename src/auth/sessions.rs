// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_session_token, hash_token};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "admin_session";

/// Returns the raw token for the cookie; only its hash is stored.
pub fn create_session(conn: &Connection, now: i64, ttl_secs: i64) -> Result<String, ServerError> {
    let raw_token = generate_session_token();
    let hash = hash_token(&raw_token);
    let expires_at = now + ttl_secs;

    conn.execute(
        r#"
        insert into admin_sessions (token_hash, created_at, expires_at)
        values (?, ?, ?)
        "#,
        params![hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn is_valid_session(conn: &Connection, raw_token: &str, now: i64) -> Result<bool, ServerError> {
    let hash = hash_token(raw_token);

    let found: Option<i64> = conn
        .query_row(
            r#"
            select id
            from admin_sessions
            where token_hash = ?
              and expires_at > ?
              and revoked_at is null
            "#,
            params![hash.as_slice(), now],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    Ok(found.is_some())
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update admin_sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}
