use sqlx::SqlitePool;

use domain::{CommentContext, CommentRepository, NewComment, Role};

use crate::repositories::{SqliteCommentRepository, UserRepository};

/// Seed the database with sample users, catalog entries, and comments
/// for development. No-op when users already exist.
pub async fn seed_dev_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    if UserRepository::count(pool).await? > 0 {
        return Ok(());
    }

    tracing::debug!("Seeding database with sample data...");

    let alice = UserRepository::create(pool, "alice", Role::User).await?;
    let bob = UserRepository::create(pool, "bob", Role::User).await?;
    UserRepository::create(pool, "mika", Role::Moderator).await?;

    sqlx::query("INSERT INTO anime (title) VALUES ('Sousou no Frieren'), ('Dungeon Meshi')")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO manga (title) VALUES ('Berserk')")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO chapters (manga_id, title) VALUES (1, 'The Black Swordsman')")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO episodes (anime_id, title) VALUES (1, 'The Journey''s End')")
        .execute(pool)
        .await?;

    let comments = SqliteCommentRepository::new(pool.clone());
    let root = comments
        .create(NewComment {
            author_id: alice,
            context: CommentContext::anime(1),
            parent_id: None,
            content: "The pacing this season is incredible.".to_string(),
            is_spoiler: false,
        })
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    comments
        .create(NewComment {
            author_id: bob,
            context: CommentContext::anime(1),
            parent_id: Some(root.id),
            content: "Agreed, episode 7 was a highlight.".to_string(),
            is_spoiler: false,
        })
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    tracing::info!("Seeded sample users, catalog entries, and comments");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;
        seed_dev_data(&pool).await.unwrap();
        let users = UserRepository::count(&pool).await.unwrap();
        assert!(users > 0);

        seed_dev_data(&pool).await.unwrap();
        assert_eq!(UserRepository::count(&pool).await.unwrap(), users);
    }
}
