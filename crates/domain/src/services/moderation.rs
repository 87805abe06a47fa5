//! Moderation controller: hide / approve / delete with authority checks.

use std::sync::Arc;

use crate::comment::{Comment, CommentRepository};
use crate::error::{DomainError, DomainResult};
use crate::moderation::ModerationAction;

use super::comments::{delete_with_policy, DeleteResult};
use super::traits::AuthorityResolver;

/// Outcome of a moderation action. Hide and approve return the updated
/// comment; delete follows the hard/soft policy and may destroy the row.
#[derive(Debug, Clone)]
pub enum ModerationOutcome {
    Updated(Comment),
    Deleted(DeleteResult),
}

/// Service applying moderation actions.
pub struct ModerationService {
    comments: Arc<dyn CommentRepository>,
    roles: Arc<dyn AuthorityResolver>,
}

impl ModerationService {
    pub fn new(comments: Arc<dyn CommentRepository>, roles: Arc<dyn AuthorityResolver>) -> Self {
        Self { comments, roles }
    }

    /// Apply a moderation action. Fails with `Forbidden` unless the
    /// actor's role carries moderation authority; moderator deletion
    /// bypasses the author-identity check.
    pub async fn moderate(
        &self,
        comment_id: i64,
        actor_id: i64,
        action: ModerationAction,
    ) -> DomainResult<ModerationOutcome> {
        let role = self.roles.role_of(actor_id).await?;
        if !role.has_moderation_authority() {
            return Err(DomainError::Forbidden);
        }

        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment", comment_id))?;

        match action {
            ModerationAction::Hide => {
                let updated = self.comments.set_hidden(comment_id, true).await?;
                Ok(ModerationOutcome::Updated(updated))
            }
            ModerationAction::Approve => {
                let updated = self.comments.set_hidden(comment_id, false).await?;
                Ok(ModerationOutcome::Updated(updated))
            }
            ModerationAction::Delete => {
                let result = delete_with_policy(self.comments.as_ref(), &comment).await?;
                Ok(ModerationOutcome::Deleted(result))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{CommentContext, NewComment, DELETED_PLACEHOLDER};
    use crate::role::Role;
    use crate::services::mocks::{InMemoryCommentRepository, StaticAuthorityResolver};

    struct Harness {
        service: ModerationService,
        comments: Arc<InMemoryCommentRepository>,
        roles: Arc<StaticAuthorityResolver>,
    }

    fn harness() -> Harness {
        let comments = Arc::new(InMemoryCommentRepository::new());
        let roles = Arc::new(StaticAuthorityResolver::new());
        Harness {
            service: ModerationService::new(comments.clone(), roles.clone()),
            comments,
            roles,
        }
    }

    async fn seed(comments: &InMemoryCommentRepository, parent_id: Option<i64>) -> i64 {
        comments
            .create(NewComment {
                author_id: 10,
                context: CommentContext::anime(1),
                parent_id,
                content: "spoilers everywhere".into(),
                is_spoiler: false,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_regular_user_cannot_moderate() {
        let h = harness();
        let id = seed(&h.comments, None).await;
        let result = h.service.moderate(id, 99, ModerationAction::Hide).await;
        assert!(matches!(result, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_hide_then_approve_round_trip() {
        let h = harness();
        h.roles.set_role(50, Role::Moderator);
        let id = seed(&h.comments, None).await;

        let outcome = h
            .service
            .moderate(id, 50, ModerationAction::Hide)
            .await
            .unwrap();
        let ModerationOutcome::Updated(hidden) = outcome else {
            panic!("expected updated comment");
        };
        assert!(hidden.is_hidden);
        // Hiding never alters content.
        assert_eq!(hidden.content, "spoilers everywhere");

        let outcome = h
            .service
            .moderate(id, 50, ModerationAction::Approve)
            .await
            .unwrap();
        let ModerationOutcome::Updated(approved) = outcome else {
            panic!("expected updated comment");
        };
        assert!(!approved.is_hidden);
    }

    #[tokio::test]
    async fn test_moderator_delete_bypasses_author_check() {
        let h = harness();
        h.roles.set_role(50, Role::Admin);
        let id = seed(&h.comments, None).await;

        let outcome = h
            .service
            .moderate(id, 50, ModerationAction::Delete)
            .await
            .unwrap();
        let ModerationOutcome::Deleted(result) = outcome else {
            panic!("expected delete result");
        };
        assert!(result.hard_deleted);
        assert!(h.comments.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moderator_delete_with_replies_is_soft() {
        let h = harness();
        h.roles.set_role(50, Role::SuperAdmin);
        let root = seed(&h.comments, None).await;
        seed(&h.comments, Some(root)).await;

        let outcome = h
            .service
            .moderate(root, 50, ModerationAction::Delete)
            .await
            .unwrap();
        let ModerationOutcome::Deleted(result) = outcome else {
            panic!("expected delete result");
        };
        assert!(!result.hard_deleted);

        let kept = h.comments.find_by_id(root).await.unwrap().unwrap();
        assert_eq!(kept.content, DELETED_PLACEHOLDER);
        assert!(kept.is_hidden);
    }

    #[tokio::test]
    async fn test_moderate_missing_comment_is_not_found() {
        let h = harness();
        h.roles.set_role(50, Role::Moderator);
        assert!(matches!(
            h.service.moderate(404, 50, ModerationAction::Hide).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
