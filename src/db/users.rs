//! Identity lookup.
//!
//! The bot never writes to `users`; operators maintain trust levels out of
//! band.

use super::DbError;
use crate::user::User;
use sqlx::SqlitePool;

/// Repository for identity records.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the stored identity for `nick` (case-insensitive).
    ///
    /// The returned user carries the nick as the sender typed it, not as it
    /// was stored.
    pub async fn find_by_nick(&self, nick: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, (Option<String>, i64, bool)>(
            r#"
            SELECT host_mask, trust_level, nick_trusted
            FROM users
            WHERE nick = ?
            "#,
        )
        .bind(nick)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(host_mask, trust_level, nick_trusted)| User {
            nick: nick.to_string(),
            host_mask,
            trust_level: u32::try_from(trust_level).unwrap_or(0),
            nick_trusted,
            channel: None,
        }))
    }

    /// Resolve `nick` to its stored identity, or an anonymous record.
    pub async fn resolve(&self, nick: &str) -> Result<User, DbError> {
        Ok(self
            .find_by_nick(nick)
            .await?
            .unwrap_or_else(|| User::anonymous(nick)))
    }
}
