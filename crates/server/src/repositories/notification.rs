use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use domain::{DomainResult, NotificationKind, NotificationSink};

use super::persistence;

/// A stored notification. The payload is the opaque JSON the engine
/// attached when the event fired.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub kind: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub is_read: bool,
}

/// Common SELECT fields for notification queries
const SELECT_NOTIFICATION: &str = r#"
    SELECT
        id, created_at, user_id, kind, payload, is_read
    FROM notifications
"#;

pub struct NotificationRepository;

impl NotificationRepository {
    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
            SELECT_NOTIFICATION
        );
        let rows = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Mark all of a user's notifications read.
    pub async fn mark_all_read(pool: &SqlitePool, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Persists notifications delivered by the engine's side-effect queue.
pub struct SqliteNotificationSink {
    pool: SqlitePool,
}

impl SqliteNotificationSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for SqliteNotificationSink {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (created_at, user_id, kind, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .bind(kind.as_str())
        .bind(payload.to_string())
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    created_at: DateTime<Utc>,
    user_id: i64,
    kind: String,
    payload: String,
    is_read: bool,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            user_id: row.user_id,
            kind: row.kind,
            payload: serde_json::from_str(&row.payload).unwrap_or(serde_json::Value::Null),
            is_read: row.is_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;

    #[tokio::test]
    async fn test_notify_persists_payload_for_listing() {
        let pool = test_pool().await;
        let sink = SqliteNotificationSink::new(pool.clone());

        sink.notify(
            7,
            NotificationKind::Reply,
            serde_json::json!({"commentId": 3, "excerpt": "I disagree"}),
        )
        .await
        .unwrap();

        let list = NotificationRepository::list_for_user(&pool, 7, 50)
            .await
            .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, "reply");
        assert_eq!(list[0].payload["commentId"], 3);
        assert!(!list[0].is_read);

        // Another user sees nothing.
        assert!(NotificationRepository::list_for_user(&pool, 8, 50)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let pool = test_pool().await;
        let sink = SqliteNotificationSink::new(pool.clone());
        sink.notify(7, NotificationKind::Reply, serde_json::json!({}))
            .await
            .unwrap();
        sink.notify(7, NotificationKind::Reply, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(NotificationRepository::mark_all_read(&pool, 7).await.unwrap(), 2);
        let list = NotificationRepository::list_for_user(&pool, 7, 50)
            .await
            .unwrap();
        assert!(list.iter().all(|n| n.is_read));
    }
}
