use rusqlite::{params, Connection};

use crate::domain::feedback::{Feedback, FeedbackType, NewFeedback};
use crate::errors::ServerError;

pub const FEEDBACK_LIST_LIMIT: i64 = 100;

pub fn insert_feedback(conn: &Connection, input: &NewFeedback, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into feedback (name, email, phone, rating, feedback_type, subject, message, created_at)
        values (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            input.name,
            input.email,
            input.phone,
            input.rating,
            input.feedback_type.as_str(),
            input.subject,
            input.message,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert feedback failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Newest first, at most `FEEDBACK_LIST_LIMIT` entries.
pub fn list_feedback(conn: &Connection) -> Result<Vec<Feedback>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select id, name, email, phone, rating, feedback_type, subject, message, created_at
            from feedback
            order by created_at desc, id desc
            limit ?
            "#,
        )
        .map_err(|e| ServerError::DbError(format!("prepare list feedback failed: {e}")))?;

    let rows = stmt
        .query_map(params![FEEDBACK_LIST_LIMIT], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, u8>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, String>(6)?,
                r.get::<_, String>(7)?,
                r.get::<_, i64>(8)?,
            ))
        })
        .map_err(|e| ServerError::DbError(format!("list feedback failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, email, phone, rating, kind, subject, message, created_at) =
            row.map_err(|e| ServerError::DbError(format!("read feedback row failed: {e}")))?;

        let feedback_type = kind.parse::<FeedbackType>().unwrap_or_else(|_| {
            log::warn!("Feedback {id} has unknown type '{kind}', showing as other");
            FeedbackType::Other
        });

        out.push(Feedback {
            id,
            name,
            email,
            phone,
            rating,
            feedback_type,
            subject,
            message,
            created_at,
        });
    }

    Ok(out)
}

pub fn delete_feedback(conn: &Connection, id: i64) -> Result<(), ServerError> {
    let changed = conn
        .execute("delete from feedback where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete feedback failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
