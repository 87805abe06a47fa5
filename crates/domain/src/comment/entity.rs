//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::CommentContext;

/// Content a soft-deleted comment is rewritten to. The row is kept so
/// descendant replies remain attached to a valid tree.
pub const DELETED_PLACEHOLDER: &str = "[deleted]";

/// A single comment in a thread.
///
/// `upvotes` and `downvotes` are adjusted only through the vote ledger's
/// atomic operations, never set directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub author_id: i64,
    /// Content entity this thread is scoped to.
    #[serde(flatten)]
    pub context: CommentContext,
    /// Parent comment; `None` for root comments.
    pub parent_id: Option<i64>,

    pub content: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub is_spoiler: bool,
    pub is_hidden: bool,
    pub is_edited: bool,
}

impl Comment {
    /// Net score, always derived and never persisted.
    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    /// Total vote volume, used as the controversial tie-break.
    pub fn vote_volume(&self) -> i64 {
        self.upvotes + self.downvotes
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
