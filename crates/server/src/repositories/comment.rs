use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use domain::{
    Comment, CommentContext, CommentRepository, DomainError, DomainResult, NewComment, ThreadScope,
};

use super::persistence;

/// Common SELECT fields for comment queries
const SELECT_COMMENT: &str = r#"
    SELECT
        id, created_at, updated_at,
        author_id, anime_id, manga_id, chapter_id, episode_id, parent_id,
        content, upvotes, downvotes, is_spoiler, is_hidden, is_edited
    FROM comments
"#;

/// SQLite-backed comment store.
pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Comment>> {
        let query = format!("{} WHERE id = $1", SELECT_COMMENT);
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(row.map(Into::into))
    }

    async fn list_scope(&self, scope: ThreadScope) -> DomainResult<Vec<Comment>> {
        // `IS` instead of `=` so unset context columns match their NULLs.
        let mut query = format!(
            "{} WHERE anime_id IS $1 AND manga_id IS $2 AND chapter_id IS $3 \
             AND episode_id IS $4 AND parent_id IS $5",
            SELECT_COMMENT
        );
        if !scope.include_hidden {
            query.push_str(" AND is_hidden = FALSE");
        }

        let rows = sqlx::query_as::<_, CommentRow>(&query)
            .bind(scope.context.anime_id)
            .bind(scope.context.manga_id)
            .bind(scope.context.chapter_id)
            .bind(scope.context.episode_id)
            .bind(scope.parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_replies(&self, id: i64) -> DomainResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)
    }

    async fn create(&self, data: NewComment) -> DomainResult<Comment> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO comments
                (created_at, updated_at, author_id,
                 anime_id, manga_id, chapter_id, episode_id, parent_id,
                 content, is_spoiler)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(data.author_id)
        .bind(data.context.anime_id)
        .bind(data.context.manga_id)
        .bind(data.context.chapter_id)
        .bind(data.context.episode_id)
        .bind(data.parent_id)
        .bind(&data.content)
        .bind(data.is_spoiler)
        .fetch_one(&self.pool)
        .await
        .map_err(persistence)?;

        let id: i64 = sqlx::Row::get(&result, "id");
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("comment", id))
    }

    async fn update(
        &self,
        id: i64,
        content: Option<String>,
        is_spoiler: Option<bool>,
    ) -> DomainResult<Comment> {
        let result = sqlx::query(
            r#"
            UPDATE comments SET
                content = COALESCE($1, content),
                is_edited = CASE WHEN $1 IS NOT NULL THEN TRUE ELSE is_edited END,
                is_spoiler = COALESCE($2, is_spoiler),
                updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(&content)
        .bind(is_spoiler)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("comment", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("comment", id))
    }

    async fn set_hidden(&self, id: i64, hidden: bool) -> DomainResult<Comment> {
        let result = sqlx::query("UPDATE comments SET is_hidden = $1, updated_at = $2 WHERE id = $3")
            .bind(hidden)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("comment", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("comment", id))
    }

    async fn soft_delete(&self, id: i64, placeholder: &str) -> DomainResult<Comment> {
        let result = sqlx::query(
            "UPDATE comments SET content = $1, is_hidden = TRUE, updated_at = $2 WHERE id = $3",
        )
        .bind(placeholder)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("comment", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("comment", id))
    }

    async fn hard_delete(&self, id: i64) -> DomainResult<bool> {
        // The comment row and its ledger rows go together or not at
        // all. The NOT EXISTS guard re-checks for replies inside the
        // transaction, closing the window between the policy's count
        // and the delete.
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let result = sqlx::query(
            "DELETE FROM comments WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM comments WHERE parent_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            sqlx::query("DELETE FROM votes WHERE comment_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(persistence)?;
        }
        tx.commit().await.map_err(persistence)?;

        Ok(deleted)
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    anime_id: Option<i64>,
    manga_id: Option<i64>,
    chapter_id: Option<i64>,
    episode_id: Option<i64>,
    parent_id: Option<i64>,
    content: String,
    upvotes: i64,
    downvotes: i64,
    is_spoiler: bool,
    is_hidden: bool,
    is_edited: bool,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author_id: row.author_id,
            context: CommentContext {
                anime_id: row.anime_id,
                manga_id: row.manga_id,
                chapter_id: row.chapter_id,
                episode_id: row.episode_id,
            },
            parent_id: row.parent_id,
            content: row.content,
            upvotes: row.upvotes,
            downvotes: row.downvotes,
            is_spoiler: row.is_spoiler,
            is_hidden: row.is_hidden,
            is_edited: row.is_edited,
        }
    }
}
