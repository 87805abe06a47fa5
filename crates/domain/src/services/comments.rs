//! Comment tree manager: creation, edits, and the deletion lifecycle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::comment::{
    Comment, CommentRepository, CreateCommentRequest, EditCommentRequest, NewComment,
    DELETED_PLACEHOLDER,
};
use crate::error::{DomainError, DomainResult};

use super::hooks::HookDispatcher;
use super::traits::{AuthorityResolver, ContextValidator, NotificationKind};

/// XP awarded for a new root comment.
pub const XP_ROOT_COMMENT: i64 = 5;
/// XP awarded for a reply.
pub const XP_REPLY_COMMENT: i64 = 3;

/// Outcome of a delete request.
///
/// A comment with replies is never physically removed; its content is
/// rewritten to a placeholder and it is hidden, so the reply subtree
/// stays attached to a valid tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub hard_deleted: bool,
}

/// Service for creating, editing, and deleting comments.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    catalog: Arc<dyn ContextValidator>,
    roles: Arc<dyn AuthorityResolver>,
    hooks: HookDispatcher,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        catalog: Arc<dyn ContextValidator>,
        roles: Arc<dyn AuthorityResolver>,
        hooks: HookDispatcher,
    ) -> Self {
        Self {
            comments,
            catalog,
            roles,
            hooks,
        }
    }

    /// Create a comment, returning it together with the XP awarded.
    ///
    /// XP and the reply notification are queued fire-and-forget; their
    /// failure never rolls back or fails the creation.
    pub async fn create(&self, request: CreateCommentRequest) -> DomainResult<(Comment, i64)> {
        let (kind, target_id) = request.context.target();
        if !self.catalog.exists(kind, target_id).await? {
            return Err(DomainError::not_found(kind.as_str(), target_id));
        }

        let parent = match request.parent_id {
            Some(parent_id) => {
                let parent = self
                    .comments
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DomainError::not_found("comment", parent_id))?;
                if !parent.context.matches(&request.context) {
                    return Err(DomainError::ContextMismatch);
                }
                Some(parent)
            }
            None => None,
        };

        let comment = self
            .comments
            .create(NewComment {
                author_id: request.author_id,
                context: request.context,
                parent_id: request.parent_id,
                content: request.content,
                is_spoiler: request.is_spoiler,
            })
            .await?;

        let xp = if comment.is_root() {
            XP_ROOT_COMMENT
        } else {
            XP_REPLY_COMMENT
        };
        self.hooks.award_xp(comment.author_id, xp);

        if let Some(parent) = parent {
            // Replying to yourself does not generate a notification.
            if parent.author_id != comment.author_id {
                self.hooks.notify(
                    parent.author_id,
                    NotificationKind::Reply,
                    serde_json::json!({
                        "commentId": comment.id,
                        "parentId": parent.id,
                        "authorId": comment.author_id,
                        "excerpt": excerpt(&comment.content),
                    }),
                );
            }
        }

        Ok((comment, xp))
    }

    /// Edit content and/or the spoiler flag. Allowed for the author and
    /// for callers with moderation authority.
    pub async fn edit(
        &self,
        comment_id: i64,
        actor_id: i64,
        request: EditCommentRequest,
    ) -> DomainResult<Comment> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment", comment_id))?;
        self.check_authority(&comment, actor_id).await?;

        self.comments
            .update(comment_id, request.content, request.is_spoiler)
            .await
    }

    /// Delete a comment. Leaf comments are physically removed; comments
    /// with replies are soft-deleted.
    pub async fn delete(&self, comment_id: i64, actor_id: i64) -> DomainResult<DeleteResult> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment", comment_id))?;
        self.check_authority(&comment, actor_id).await?;

        delete_with_policy(self.comments.as_ref(), &comment).await
    }

    async fn check_authority(&self, comment: &Comment, actor_id: i64) -> DomainResult<()> {
        if comment.author_id == actor_id {
            return Ok(());
        }
        let role = self.roles.role_of(actor_id).await?;
        if role.has_moderation_authority() {
            return Ok(());
        }
        Err(DomainError::Forbidden)
    }
}

/// Shared hard/soft delete policy; also used by moderator deletion,
/// which bypasses the author-identity check.
pub(crate) async fn delete_with_policy(
    comments: &dyn CommentRepository,
    comment: &Comment,
) -> DomainResult<DeleteResult> {
    // A reply may land between the count and the removal; hard_delete
    // re-checks atomically and reports false, and the soft path takes
    // over so the new reply keeps its parent.
    if comments.count_replies(comment.id).await? == 0
        && comments.hard_delete(comment.id).await?
    {
        return Ok(DeleteResult { hard_deleted: true });
    }
    comments
        .soft_delete(comment.id, DELETED_PLACEHOLDER)
        .await?;
    Ok(DeleteResult {
        hard_deleted: false,
    })
}

fn excerpt(content: &str) -> String {
    const EXCERPT_LEN: usize = 120;
    if content.chars().count() <= EXCERPT_LEN {
        content.to_string()
    } else {
        let mut cut: String = content.chars().take(EXCERPT_LEN).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{CommentContext, ContextKind, ThreadScope};
    use crate::role::Role;
    use crate::services::mocks::{
        InMemoryCommentRepository, RecordingNotificationSink, RecordingXpService,
        StaticAuthorityResolver, StaticContextValidator,
    };
    use std::time::Duration;

    struct Harness {
        service: CommentService,
        comments: Arc<InMemoryCommentRepository>,
        roles: Arc<StaticAuthorityResolver>,
        xp: Arc<RecordingXpService>,
        notifications: Arc<RecordingNotificationSink>,
    }

    fn harness() -> Harness {
        let comments = Arc::new(InMemoryCommentRepository::new());
        let catalog = Arc::new(StaticContextValidator::new());
        catalog.insert(ContextKind::Anime, 1);
        catalog.insert(ContextKind::Episode, 12);
        let roles = Arc::new(StaticAuthorityResolver::new());
        let xp = Arc::new(RecordingXpService::new());
        let notifications = Arc::new(RecordingNotificationSink::new());
        let hooks = HookDispatcher::spawn(xp.clone(), notifications.clone(), 32);
        Harness {
            service: CommentService::new(comments.clone(), catalog, roles.clone(), hooks),
            comments,
            roles,
            xp,
            notifications,
        }
    }

    fn create_request(
        author_id: i64,
        context: CommentContext,
        parent_id: Option<i64>,
    ) -> CreateCommentRequest {
        CreateCommentRequest::new(author_id, context, parent_id, "great episode", false).unwrap()
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within timeout");
    }

    #[tokio::test]
    async fn test_create_root_awards_root_xp() {
        let h = harness();
        let (comment, xp) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        assert!(comment.is_root());
        assert_eq!(xp, XP_ROOT_COMMENT);
        wait_until(|| h.xp.awards() == vec![(10, XP_ROOT_COMMENT)]).await;
        assert!(h.notifications.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_create_reply_awards_reply_xp_and_notifies_parent_author() {
        let h = harness();
        let (root, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        let (reply, xp) = h
            .service
            .create(create_request(20, CommentContext::anime(1), Some(root.id)))
            .await
            .unwrap();
        assert_eq!(reply.parent_id, Some(root.id));
        assert_eq!(xp, XP_REPLY_COMMENT);

        wait_until(|| h.notifications.delivered().len() == 1).await;
        let (user_id, kind, payload) = h.notifications.delivered().remove(0);
        assert_eq!(user_id, 10);
        assert_eq!(kind, NotificationKind::Reply);
        assert_eq!(payload["commentId"], reply.id);
    }

    #[tokio::test]
    async fn test_self_reply_does_not_notify() {
        let h = harness();
        let (root, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        h.service
            .create(create_request(10, CommentContext::anime(1), Some(root.id)))
            .await
            .unwrap();

        // Both XP awards land, no notification does.
        wait_until(|| h.xp.awards().len() == 2).await;
        assert!(h.notifications.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_context_entity_is_not_found() {
        let h = harness();
        let result = h
            .service
            .create(create_request(10, CommentContext::manga(99), None))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reply_context_must_match_parent() {
        let h = harness();
        let (root, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();

        // Same context succeeds.
        assert!(h
            .service
            .create(create_request(20, CommentContext::anime(1), Some(root.id)))
            .await
            .is_ok());

        // Different context (even a valid entity) is a mismatch.
        let result = h
            .service
            .create(create_request(20, CommentContext::episode(12), Some(root.id)))
            .await;
        assert!(matches!(result, Err(DomainError::ContextMismatch)));
    }

    #[tokio::test]
    async fn test_reply_to_missing_parent_is_not_found() {
        let h = harness();
        let result = h
            .service
            .create(create_request(10, CommentContext::anime(1), Some(404)))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_edit_by_stranger_is_forbidden() {
        let h = harness();
        let (comment, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        let result = h
            .service
            .edit(
                comment.id,
                99,
                EditCommentRequest::new(Some("hijacked"), None).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_edit_marks_edited_only_on_content_change() {
        let h = harness();
        let (comment, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();

        let updated = h
            .service
            .edit(
                comment.id,
                10,
                EditCommentRequest::new(None, Some(true)).unwrap(),
            )
            .await
            .unwrap();
        assert!(updated.is_spoiler);
        assert!(!updated.is_edited);

        let updated = h
            .service
            .edit(
                comment.id,
                10,
                EditCommentRequest::new(Some("actually, mid"), None).unwrap(),
            )
            .await
            .unwrap();
        assert!(updated.is_edited);
        assert_eq!(updated.content, "actually, mid");
    }

    #[tokio::test]
    async fn test_moderator_may_edit_others_comments() {
        let h = harness();
        h.roles.set_role(50, Role::Moderator);
        let (comment, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        assert!(h
            .service
            .edit(
                comment.id,
                50,
                EditCommentRequest::new(Some("tidied up"), None).unwrap(),
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_leaf_is_hard() {
        let h = harness();
        let (comment, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        let result = h.service.delete(comment.id, 10).await.unwrap();
        assert!(result.hard_deleted);
        assert!(h.comments.find_by_id(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_with_replies_is_soft_and_preserves_tree() {
        let h = harness();
        let (root, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        let (reply, _) = h
            .service
            .create(create_request(20, CommentContext::anime(1), Some(root.id)))
            .await
            .unwrap();

        let result = h.service.delete(root.id, 10).await.unwrap();
        assert!(!result.hard_deleted);

        let kept = h.comments.find_by_id(root.id).await.unwrap().unwrap();
        assert_eq!(kept.content, DELETED_PLACEHOLDER);
        assert!(kept.is_hidden);

        // The reply is still independently listable under its parent.
        let replies = h
            .comments
            .list_scope(ThreadScope {
                context: CommentContext::anime(1),
                parent_id: Some(root.id),
                include_hidden: false,
            })
            .await
            .unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, reply.id);
    }

    /// Delegates to the in-memory store but reports a reply count of
    /// zero, simulating a reply that lands between the count and the
    /// removal.
    struct StaleReplyCountRepository(Arc<InMemoryCommentRepository>);

    #[async_trait::async_trait]
    impl CommentRepository for StaleReplyCountRepository {
        async fn find_by_id(&self, id: i64) -> DomainResult<Option<Comment>> {
            self.0.find_by_id(id).await
        }

        async fn list_scope(&self, scope: ThreadScope) -> DomainResult<Vec<Comment>> {
            self.0.list_scope(scope).await
        }

        async fn count_replies(&self, _id: i64) -> DomainResult<i64> {
            Ok(0)
        }

        async fn create(&self, data: NewComment) -> DomainResult<Comment> {
            self.0.create(data).await
        }

        async fn update(
            &self,
            id: i64,
            content: Option<String>,
            is_spoiler: Option<bool>,
        ) -> DomainResult<Comment> {
            self.0.update(id, content, is_spoiler).await
        }

        async fn set_hidden(&self, id: i64, hidden: bool) -> DomainResult<Comment> {
            self.0.set_hidden(id, hidden).await
        }

        async fn soft_delete(&self, id: i64, placeholder: &str) -> DomainResult<Comment> {
            self.0.soft_delete(id, placeholder).await
        }

        async fn hard_delete(&self, id: i64) -> DomainResult<bool> {
            self.0.hard_delete(id).await
        }
    }

    #[tokio::test]
    async fn test_delete_falls_back_to_soft_when_reply_lands_mid_delete() {
        let inner = Arc::new(InMemoryCommentRepository::new());
        let root = inner
            .create(NewComment {
                author_id: 10,
                context: CommentContext::anime(1),
                parent_id: None,
                content: "root".to_string(),
                is_spoiler: false,
            })
            .await
            .unwrap();
        let reply = inner
            .create(NewComment {
                author_id: 20,
                context: CommentContext::anime(1),
                parent_id: Some(root.id),
                content: "late reply".to_string(),
                is_spoiler: false,
            })
            .await
            .unwrap();

        let stale = StaleReplyCountRepository(inner.clone());
        let result = delete_with_policy(&stale, &root).await.unwrap();
        assert!(!result.hard_deleted);

        // The root survives as a soft-deleted parent for the reply.
        let kept = inner.find_by_id(root.id).await.unwrap().unwrap();
        assert_eq!(kept.content, DELETED_PLACEHOLDER);
        assert!(kept.is_hidden);
        assert!(inner.find_by_id(reply.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_by_stranger_is_forbidden() {
        let h = harness();
        let (comment, _) = h
            .service
            .create(create_request(10, CommentContext::anime(1), None))
            .await
            .unwrap();
        assert!(matches!(
            h.service.delete(comment.id, 77).await,
            Err(DomainError::Forbidden)
        ));
    }
}
