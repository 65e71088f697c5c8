//! Deferred notes between nicks.

use super::DbError;
use sqlx::SqlitePool;

/// A note waiting for (or already given to) its recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub from: String,
    /// Lower-cased recipient nick.
    pub to: String,
    pub body: String,
    /// Unix seconds.
    pub sent_at: i64,
    pub delivered: bool,
}

/// Repository for note operations.
pub struct NoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a note for `to`. The recipient is lower-cased.
    pub async fn store(&self, from: &str, to: &str, body: &str) -> Result<i64, DbError> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO notes (sender, recipient, body, sent_at, delivered)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(from)
        .bind(to.to_lowercase())
        .bind(body)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Undelivered notes for `nick`, oldest first.
    pub async fn pending_for(&self, nick: &str) -> Result<Vec<Note>, DbError> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, i64, bool)>(
            r#"
            SELECT id, sender, recipient, body, sent_at, delivered
            FROM notes
            WHERE recipient = ? AND delivered = 0
            ORDER BY sent_at, id
            "#,
        )
        .bind(nick.to_lowercase())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, from, to, body, sent_at, delivered)| Note {
                id,
                from,
                to,
                body,
                sent_at,
                delivered,
            })
            .collect())
    }

    /// Mark every note in `ids` delivered in one transaction: either all
    /// of them flip or none do.
    pub async fn mark_delivered(&self, ids: &[i64]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query("UPDATE notes SET delivered = 1 WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn pending_notes_match_recipient_case_insensitively() {
        let db = Database::new(":memory:").await.unwrap();
        db.notes().store("alice", "Bob", "first").await.unwrap();
        db.notes().store("carol", "bob", "second").await.unwrap();
        db.notes().store("alice", "dave", "other").await.unwrap();

        let pending = db.notes().pending_for("BOB").await.unwrap();
        let bodies: Vec<_> = pending.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert!(pending.iter().all(|n| n.to == "bob" && !n.delivered));
    }

    #[tokio::test]
    async fn delivered_notes_are_not_pending() {
        let db = Database::new(":memory:").await.unwrap();
        let id = db.notes().store("alice", "bob", "hi").await.unwrap();
        db.notes().mark_delivered(&[id]).await.unwrap();
        assert!(db.notes().pending_for("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_leaves_every_note_pending() {
        let db = Database::new(":memory:").await.unwrap();
        let first = db.notes().store("alice", "bob", "first").await.unwrap();
        let second = db.notes().store("alice", "bob", "second").await.unwrap();
        sqlx::query(
            "CREATE TRIGGER refuse_second BEFORE UPDATE ON notes WHEN OLD.body = 'second' \
             BEGIN SELECT RAISE(ABORT, 'refused'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(db.notes().mark_delivered(&[first, second]).await.is_err());
        assert_eq!(db.notes().pending_for("bob").await.unwrap().len(), 2);
    }
}
