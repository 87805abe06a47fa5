//! Comment repository trait.
//!
//! Defines the abstract interface for comment persistence operations.
//! Concrete implementations are provided in the infrastructure layer.

use async_trait::async_trait;

use super::{Comment, CommentContext};
use crate::error::DomainResult;

/// Data required to persist a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: i64,
    pub context: CommentContext,
    pub parent_id: Option<i64>,
    pub content: String,
    pub is_spoiler: bool,
}

/// Scope selector for listing one level of a thread: root comments of a
/// context when `parent_id` is `None`, direct replies otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ThreadScope {
    pub context: CommentContext,
    pub parent_id: Option<i64>,
    /// Hidden comments are excluded from listings by default.
    pub include_hidden: bool,
}

/// Comment repository trait.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by its ID.
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Comment>>;

    /// Fetch all comments in one thread level.
    ///
    /// Callers rank and paginate the result; listings tolerate slightly
    /// stale counters.
    async fn list_scope(&self, scope: ThreadScope) -> DomainResult<Vec<Comment>>;

    /// Count direct replies to a comment.
    async fn count_replies(&self, id: i64) -> DomainResult<i64>;

    /// Persist a new comment.
    async fn create(&self, data: NewComment) -> DomainResult<Comment>;

    /// Apply an edit. `content = None` leaves content untouched;
    /// a content change sets `is_edited`.
    async fn update(
        &self,
        id: i64,
        content: Option<String>,
        is_spoiler: Option<bool>,
    ) -> DomainResult<Comment>;

    /// Set the hidden flag without altering content.
    async fn set_hidden(&self, id: i64, hidden: bool) -> DomainResult<Comment>;

    /// Rewrite content to the placeholder and hide the comment, keeping
    /// the row so descendant replies stay attached.
    async fn soft_delete(&self, id: i64, placeholder: &str) -> DomainResult<Comment>;

    /// Physically remove a comment row and its votes, but only while it
    /// still has no replies. The reply check and the removal happen
    /// atomically, so a reply racing in keeps the row.
    ///
    /// Returns true if the row was removed.
    async fn hard_delete(&self, id: i64) -> DomainResult<bool>;
}
