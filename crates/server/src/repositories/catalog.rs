use async_trait::async_trait;
use sqlx::SqlitePool;

use domain::{ContextKind, ContextValidator, DomainResult};

use super::persistence;

/// Existence checks against the catalog tables a comment can attach to.
pub struct SqliteContextValidator {
    pool: SqlitePool,
}

impl SqliteContextValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn table(kind: ContextKind) -> &'static str {
        match kind {
            ContextKind::Anime => "anime",
            ContextKind::Manga => "manga",
            ContextKind::Chapter => "chapters",
            ContextKind::Episode => "episodes",
        }
    }
}

#[async_trait]
impl ContextValidator for SqliteContextValidator {
    async fn exists(&self, kind: ContextKind, id: i64) -> DomainResult<bool> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE id = $1", Self::table(kind));
        let count = sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;

    #[tokio::test]
    async fn test_exists_per_catalog_table() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO anime (title) VALUES ('Frieren')")
            .execute(&pool)
            .await
            .unwrap();
        let validator = SqliteContextValidator::new(pool);

        assert!(validator.exists(ContextKind::Anime, 1).await.unwrap());
        // Same id, different table.
        assert!(!validator.exists(ContextKind::Manga, 1).await.unwrap());
        assert!(!validator.exists(ContextKind::Anime, 2).await.unwrap());
    }
}
