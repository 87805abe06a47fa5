use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use domain::{AuthorityResolver, DomainResult, Role, XpService};

use super::persistence;

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub role: Role,
    pub xp: i64,
}

pub struct UserRepository;

impl UserRepository {
    /// Create a user, returning its ID.
    pub async fn create(pool: &SqlitePool, username: &str, role: Role) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, role)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(sqlx::Row::get(&result, "id"))
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, created_at, username, role, xp FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

/// Role lookups for authority checks. Unknown users resolve to the
/// default role and fail the check downstream.
pub struct SqliteAuthorityResolver {
    pool: SqlitePool,
}

impl SqliteAuthorityResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorityResolver for SqliteAuthorityResolver {
    async fn role_of(&self, user_id: i64) -> DomainResult<Role> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(role
            .map(|r| r.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}

/// XP accumulation on the users table.
pub struct SqliteXpService {
    pool: SqlitePool,
}

impl SqliteXpService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl XpService for SqliteXpService {
    async fn award(&self, user_id: i64, amount: i64) -> DomainResult<()> {
        sqlx::query("UPDATE users SET xp = xp + $1 WHERE id = $2")
            .bind(amount)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    created_at: DateTime<Utc>,
    username: String,
    role: String,
    xp: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            username: row.username,
            role: row.role.parse().unwrap_or_default(),
            xp: row.xp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;

    #[tokio::test]
    async fn test_role_round_trips_through_storage() {
        let pool = test_pool().await;
        let id = UserRepository::create(&pool, "mika", Role::Moderator)
            .await
            .unwrap();

        let resolver = SqliteAuthorityResolver::new(pool.clone());
        assert_eq!(resolver.role_of(id).await.unwrap(), Role::Moderator);

        let user = UserRepository::get_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(user.username, "mika");
        assert_eq!(user.xp, 0);
    }

    #[tokio::test]
    async fn test_unknown_user_resolves_to_default_role() {
        let pool = test_pool().await;
        let resolver = SqliteAuthorityResolver::new(pool);
        assert_eq!(resolver.role_of(999).await.unwrap(), Role::User);
    }

    #[tokio::test]
    async fn test_xp_accumulates() {
        let pool = test_pool().await;
        let id = UserRepository::create(&pool, "ren", Role::User).await.unwrap();

        let xp = SqliteXpService::new(pool.clone());
        xp.award(id, 5).await.unwrap();
        xp.award(id, 3).await.unwrap();

        let user = UserRepository::get_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(user.xp, 8);
    }
}
