//! Karma counters.
//!
//! `adjust` reads the record and then updates it by id or inserts it, all
//! inside one transaction. SQLite allows a single writer, so a second
//! process racing on the same database gets `SQLITE_BUSY` rather than a
//! lost update.

use super::DbError;
use sqlx::SqlitePool;

/// A karma counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KarmaRecord {
    pub id: i64,
    pub item: String,
    pub value: i64,
}

/// Repository for karma operations.
pub struct KarmaRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> KarmaRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, item: &str) -> Result<Option<KarmaRecord>, DbError> {
        let row = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT id, item, value FROM karma WHERE item = ?",
        )
        .bind(item)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, item, value)| KarmaRecord { id, item, value }))
    }

    /// Current value; 0 when the item has never been touched.
    pub async fn value(&self, item: &str) -> Result<i64, DbError> {
        Ok(self.find(item).await?.map_or(0, |r| r.value))
    }

    /// Add `delta` to `item` and return the new value.
    pub async fn adjust(&self, item: &str, delta: i64) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, (i64, i64)>("SELECT id, value FROM karma WHERE item = ?")
            .bind(item)
            .fetch_optional(&mut *tx)
            .await?;

        let value = match existing {
            Some((id, value)) => {
                let value = value + delta;
                sqlx::query("UPDATE karma SET value = ? WHERE id = ?")
                    .bind(value)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                value
            }
            None => {
                sqlx::query("INSERT INTO karma (item, value) VALUES (?, ?)")
                    .bind(item)
                    .bind(delta)
                    .execute(&mut *tx)
                    .await?;
                delta
            }
        };

        tx.commit().await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn absent_item_is_zero() {
        let db = Database::new(":memory:").await.unwrap();
        assert_eq!(db.karma().value("nothing").await.unwrap(), 0);
        assert!(db.karma().find("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adjust_inserts_then_updates_same_row() {
        let db = Database::new(":memory:").await.unwrap();
        assert_eq!(db.karma().adjust("item", 1).await.unwrap(), 1);
        let first = db.karma().find("item").await.unwrap().unwrap();

        assert_eq!(db.karma().adjust("item", 1).await.unwrap(), 2);
        assert_eq!(db.karma().adjust("item", -1).await.unwrap(), 1);

        let last = db.karma().find("item").await.unwrap().unwrap();
        assert_eq!(last.id, first.id);
        assert_eq!(last.value, 1);
    }

    #[tokio::test]
    async fn values_can_go_negative() {
        let db = Database::new(":memory:").await.unwrap();
        db.karma().adjust("java", -1).await.unwrap();
        db.karma().adjust("java", -1).await.unwrap();
        assert_eq!(db.karma().value("java").await.unwrap(), -2);
    }
}
