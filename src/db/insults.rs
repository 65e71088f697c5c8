//! "your mom" archive.

use super::DbError;
use sqlx::SqlitePool;

/// Repository for archived lines.
pub struct InsultRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InsultRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, text: &str) -> Result<bool, DbError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT id FROM insults WHERE text = ?")
            .bind(text)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Archive `text`. Returns false if it was already present.
    pub async fn insert(&self, text: &str) -> Result<bool, DbError> {
        let result = sqlx::query("INSERT OR IGNORE INTO insults (text) VALUES (?)")
            .bind(text)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn all_ids(&self) -> Result<Vec<i64>, DbError> {
        let rows = sqlx::query_as::<_, (i64,)>("SELECT id FROM insults ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn find_text(&self, id: i64) -> Result<Option<String>, DbError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT text FROM insults WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|(text,)| text))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn insert_is_unique() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.insults().insert("your mom is nice").await.unwrap());
        assert!(!db.insults().insert("your mom is nice").await.unwrap());
        assert!(db.insults().exists("your mom is nice").await.unwrap());
        assert_eq!(db.insults().all_ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_text_by_id() {
        let db = Database::new(":memory:").await.unwrap();
        db.insults().insert("your mom codes in cobol").await.unwrap();
        let id = db.insults().all_ids().await.unwrap()[0];
        assert_eq!(
            db.insults().find_text(id).await.unwrap().as_deref(),
            Some("your mom codes in cobol")
        );
        assert!(db.insults().find_text(id + 1).await.unwrap().is_none());
    }
}
