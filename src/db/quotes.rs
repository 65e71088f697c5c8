//! Quote archive repository.
//!
//! A quote row owns a set of nick rows in `quote_nicks`. Records are
//! immutable once stored.

use super::DbError;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

/// A stored quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub id: i64,
    pub nicknames: BTreeSet<String>,
    pub text: String,
    pub network: String,
    pub schema_version: String,
}

/// A quote about to be stored.
#[derive(Debug, Clone)]
pub struct NewQuote<'q> {
    pub nicknames: &'q BTreeSet<String>,
    pub text: &'q str,
    pub network: &'q str,
    pub schema_version: &'q str,
}

/// Repository for quote operations.
pub struct QuoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> QuoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a quote and its nick set atomically. Returns the new id.
    pub async fn insert(&self, quote: NewQuote<'_>) -> Result<i64, DbError> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO quotes (text, network, schema_version, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(quote.text)
        .bind(quote.network)
        .bind(quote.schema_version)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for nick in quote.nicknames {
            sqlx::query("INSERT OR IGNORE INTO quote_nicks (quote_id, nick) VALUES (?, ?)")
                .bind(id)
                .bind(nick.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Ids and texts of every quote on `network`, optionally restricted to
    /// quotes naming `nick` (case-insensitive exact match).
    pub async fn candidates(
        &self,
        network: &str,
        nick: Option<&str>,
    ) -> Result<Vec<(i64, String)>, DbError> {
        let rows = match nick {
            Some(nick) => {
                sqlx::query_as::<_, (i64, String)>(
                    r#"
                    SELECT q.id, q.text
                    FROM quotes q
                    WHERE q.network = ?
                      AND EXISTS (
                          SELECT 1 FROM quote_nicks n
                          WHERE n.quote_id = q.id AND n.nick = ? COLLATE NOCASE
                      )
                    ORDER BY q.id
                    "#,
                )
                .bind(network)
                .bind(nick)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, (i64, String)>(
                    "SELECT id, text FROM quotes WHERE network = ? ORDER BY id",
                )
                .bind(network)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// Text of a single quote.
    pub async fn find_text(&self, id: i64) -> Result<Option<String>, DbError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT text FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|(text,)| text))
    }

    /// Full record including its nick set.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<QuoteRecord>, DbError> {
        let row = sqlx::query_as::<_, (i64, String, String, String)>(
            "SELECT id, text, network, schema_version FROM quotes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, text, network, schema_version)) = row else {
            return Ok(None);
        };

        let nicks = sqlx::query_as::<_, (String,)>(
            "SELECT nick FROM quote_nicks WHERE quote_id = ?",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(QuoteRecord {
            id,
            nicknames: nicks.into_iter().map(|(n,)| n).collect(),
            text,
            network,
            schema_version,
        }))
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM quotes")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn nicks(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn store(db: &Database, who: &[&str], text: &str, network: &str) -> i64 {
        let set = nicks(who);
        db.quotes()
            .insert(NewQuote {
                nicknames: &set,
                text,
                network,
                schema_version: "1",
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_and_fetch_record() {
        let db = Database::new(":memory:").await.unwrap();
        let id = store(&db, &["foo", "bar"], "hello world", "slashnet").await;

        let record = db.quotes().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.nicknames, nicks(&["bar", "foo"]));
        assert_eq!(record.text, "hello world");
        assert_eq!(record.network, "slashnet");
        assert_eq!(record.schema_version, "1");
        assert_eq!(
            db.quotes().find_text(id).await.unwrap().as_deref(),
            Some("hello world")
        );
    }

    #[tokio::test]
    async fn candidates_filter_by_network_and_nick() {
        let db = Database::new(":memory:").await.unwrap();
        let a = store(&db, &["foo"], "one", "slashnet").await;
        let b = store(&db, &["Bar"], "two", "slashnet").await;
        store(&db, &["foo"], "elsewhere", "othernet").await;

        let all = db.quotes().candidates("slashnet", None).await.unwrap();
        assert_eq!(all.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![a, b]);

        let bar = db.quotes().candidates("slashnet", Some("bar")).await.unwrap();
        assert_eq!(bar, vec![(b, "two".to_string())]);

        let none = db.quotes().candidates("slashnet", Some("fo")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.quotes().find_by_id(42).await.unwrap().is_none());
        assert!(db.quotes().find_text(42).await.unwrap().is_none());
        assert_eq!(db.quotes().count().await.unwrap(), 0);
    }
}
