use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use domain::{
    DomainError, DomainResult, Vote, VoteLedgerOp, VoteRepository, VoteState, VoteTally,
    VoteTransition,
};

use super::persistence;

/// SQLite-backed vote ledger.
///
/// A cast runs as one `BEGIN IMMEDIATE` transaction: the ledger read,
/// the ledger write, and the counter adjustment commit or roll back
/// together, so concurrent casts on the same pair serialize cleanly.
/// The transaction guard rolls back on drop, so a cast cancelled
/// mid-flight never leaks an open transaction back into the pool.
pub struct SqliteVoteRepository {
    pool: SqlitePool,
}

impl SqliteVoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn cast_in_tx(
        conn: &mut SqliteConnection,
        comment_id: i64,
        voter_id: i64,
        is_upvote: bool,
    ) -> DomainResult<(VoteState, VoteTally)> {
        let existing: Option<bool> = sqlx::query_scalar(
            "SELECT is_upvote FROM votes WHERE user_id = $1 AND comment_id = $2",
        )
        .bind(voter_id)
        .bind(comment_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(persistence)?;

        let transition = VoteTransition::plan(existing, is_upvote);

        match transition.op {
            VoteLedgerOp::Insert { is_upvote } => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (user_id, comment_id, is_upvote, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(voter_id)
                .bind(comment_id)
                .bind(is_upvote)
                .bind(Utc::now())
                .execute(&mut *conn)
                .await
                .map_err(persistence)?;
            }
            VoteLedgerOp::Flip { is_upvote } => {
                sqlx::query(
                    "UPDATE votes SET is_upvote = $1 WHERE user_id = $2 AND comment_id = $3",
                )
                .bind(is_upvote)
                .bind(voter_id)
                .bind(comment_id)
                .execute(&mut *conn)
                .await
                .map_err(persistence)?;
            }
            VoteLedgerOp::Remove => {
                sqlx::query("DELETE FROM votes WHERE user_id = $1 AND comment_id = $2")
                    .bind(voter_id)
                    .bind(comment_id)
                    .execute(&mut *conn)
                    .await
                    .map_err(persistence)?;
            }
        }

        let counters: Option<(i64, i64)> = sqlx::query_as(
            r#"
            UPDATE comments SET upvotes = upvotes + $1, downvotes = downvotes + $2
            WHERE id = $3
            RETURNING upvotes, downvotes
            "#,
        )
        .bind(transition.upvote_delta)
        .bind(transition.downvote_delta)
        .bind(comment_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(persistence)?;

        let (upvotes, downvotes) =
            counters.ok_or(DomainError::not_found("comment", comment_id))?;

        Ok((transition.new_state, VoteTally { upvotes, downvotes }))
    }
}

#[async_trait]
impl VoteRepository for SqliteVoteRepository {
    async fn cast(
        &self,
        comment_id: i64,
        voter_id: i64,
        is_upvote: bool,
    ) -> DomainResult<(VoteState, VoteTally)> {
        // IMMEDIATE takes the write lock up front so concurrent casts
        // queue on the busy timeout instead of failing on lock upgrade.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(persistence)?;

        let result = Self::cast_in_tx(&mut *tx, comment_id, voter_id, is_upvote).await?;
        tx.commit().await.map_err(persistence)?;
        Ok(result)
    }

    async fn find(&self, voter_id: i64, comment_id: i64) -> DomainResult<Option<Vote>> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT user_id, comment_id, is_upvote, created_at
            FROM votes
            WHERE user_id = $1 AND comment_id = $2
            "#,
        )
        .bind(voter_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(row.map(Into::into))
    }

    async fn states_for(
        &self,
        voter_id: i64,
        comment_ids: &[i64],
    ) -> DomainResult<HashMap<i64, VoteState>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: Vec<String> = (0..comment_ids.len())
            .map(|i| format!("${}", i + 2))
            .collect();
        let query = format!(
            "SELECT comment_id, is_upvote FROM votes WHERE user_id = $1 AND comment_id IN ({})",
            placeholders.join(", ")
        );

        let mut q = sqlx::query_as::<_, (i64, bool)>(&query).bind(voter_id);
        for id in comment_ids {
            q = q.bind(id);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(persistence)?;

        Ok(rows
            .into_iter()
            .map(|(id, is_upvote)| (id, VoteState::from_ledger(Some(is_upvote))))
            .collect())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    user_id: i64,
    comment_id: i64,
    is_upvote: bool,
    created_at: DateTime<Utc>,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            user_id: row.user_id,
            comment_id: row.comment_id,
            is_upvote: row.is_upvote,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repositories::test_support::{test_pool, test_pool_with};
    use crate::repositories::SqliteCommentRepository;
    use domain::{CommentContext, CommentRepository, NewComment};

    async fn seed_comment(comments: &SqliteCommentRepository, author_id: i64) -> i64 {
        comments
            .create(NewComment {
                author_id,
                context: CommentContext::anime(1),
                parent_id: None,
                content: "hot take".to_string(),
                is_spoiler: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_cast_toggle_and_switch_sequence() {
        let pool = test_pool().await;
        let comments = SqliteCommentRepository::new(pool.clone());
        let votes = SqliteVoteRepository::new(pool);
        let comment_id = seed_comment(&comments, 1).await;

        let (state, tally) = votes.cast(comment_id, 2, true).await.unwrap();
        assert_eq!(state, VoteState::Upvoted);
        assert_eq!((tally.upvotes, tally.downvotes), (1, 0));

        let (state, tally) = votes.cast(comment_id, 2, true).await.unwrap();
        assert_eq!(state, VoteState::Neutral);
        assert_eq!((tally.upvotes, tally.downvotes), (0, 0));
        assert!(votes.find(2, comment_id).await.unwrap().is_none());

        votes.cast(comment_id, 2, false).await.unwrap();
        let (state, tally) = votes.cast(comment_id, 2, true).await.unwrap();
        assert_eq!(state, VoteState::Upvoted);
        assert_eq!((tally.upvotes, tally.downvotes), (1, 0));

        let row = votes.find(2, comment_id).await.unwrap().unwrap();
        assert!(row.is_upvote);
    }

    #[tokio::test]
    async fn test_cast_on_missing_comment_rolls_back_ledger() {
        let pool = test_pool().await;
        let votes = SqliteVoteRepository::new(pool);

        assert!(matches!(
            votes.cast(404, 2, true).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(votes.find(2, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_cast_returns_a_clean_connection_to_the_pool() {
        // A single connection makes any leaked transaction visible to
        // the next caller.
        let pool = test_pool_with(1).await;
        let comments = SqliteCommentRepository::new(pool.clone());
        let votes = SqliteVoteRepository::new(pool.clone());
        let comment_id = seed_comment(&comments, 1).await;

        assert!(votes.cast(404, 2, true).await.is_err());

        // No transaction left open on the reacquired connection.
        assert!(sqlx::query("ROLLBACK").execute(&pool).await.is_err());

        let (_, tally) = votes.cast(comment_id, 2, true).await.unwrap();
        assert_eq!((tally.upvotes, tally.downvotes), (1, 0));
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back_before_pool_reuse() {
        let pool = test_pool_with(1).await;
        let comments = SqliteCommentRepository::new(pool.clone());
        let comment_id = seed_comment(&comments, 1).await;

        // Same guard `cast` uses; dropping it without commit must undo
        // the write before the connection is handed out again.
        {
            let mut tx = pool.begin_with("BEGIN IMMEDIATE").await.unwrap();
            sqlx::query("UPDATE comments SET upvotes = upvotes + 1 WHERE id = $1")
                .bind(comment_id)
                .execute(&mut *tx)
                .await
                .unwrap();
        }

        let comment = comments.find_by_id(comment_id).await.unwrap().unwrap();
        assert_eq!(comment.upvotes, 0);
    }

    #[tokio::test]
    async fn test_concurrent_distinct_voters_lose_no_updates() {
        let pool = test_pool().await;
        let comments = SqliteCommentRepository::new(pool.clone());
        let votes = Arc::new(SqliteVoteRepository::new(pool));
        let comment_id = seed_comment(&comments, 1).await;

        let mut tasks = Vec::new();
        for voter in 2..7 {
            let votes = votes.clone();
            tasks.push(tokio::spawn(async move {
                votes.cast(comment_id, voter, true).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let comment = comments.find_by_id(comment_id).await.unwrap().unwrap();
        assert_eq!(comment.upvotes, 5);
        assert_eq!(comment.downvotes, 0);
    }

    #[tokio::test]
    async fn test_states_for_maps_only_voted_comments() {
        let pool = test_pool().await;
        let comments = SqliteCommentRepository::new(pool.clone());
        let votes = SqliteVoteRepository::new(pool);
        let a = seed_comment(&comments, 1).await;
        let b = seed_comment(&comments, 1).await;
        let c = seed_comment(&comments, 1).await;

        votes.cast(a, 2, true).await.unwrap();
        votes.cast(b, 2, false).await.unwrap();

        let states = votes.states_for(2, &[a, b, c]).await.unwrap();
        assert_eq!(states.get(&a), Some(&VoteState::Upvoted));
        assert_eq!(states.get(&b), Some(&VoteState::Downvoted));
        assert!(!states.contains_key(&c));

        assert!(votes.states_for(2, &[]).await.unwrap().is_empty());
    }
}
