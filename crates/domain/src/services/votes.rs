//! Vote ledger service.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::comment::CommentRepository;
use crate::error::{DomainError, DomainResult};
use crate::vote::{VoteRepository, VoteState};

/// Result of casting a vote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    /// The caller's state after the cast.
    pub vote: VoteState,
    pub upvotes: i64,
    pub downvotes: i64,
    pub net_score: i64,
}

/// Service owning the one-vote-per-(user, comment) invariant.
pub struct VoteService {
    comments: Arc<dyn CommentRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl VoteService {
    pub fn new(comments: Arc<dyn CommentRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { comments, votes }
    }

    /// Cast a vote. Toggles off on a repeat of the same direction,
    /// switches atomically on the opposite direction.
    ///
    /// Never touches content or `is_edited`.
    pub async fn cast(
        &self,
        comment_id: i64,
        voter_id: i64,
        is_upvote: bool,
    ) -> DomainResult<VoteResult> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment", comment_id))?;
        if comment.author_id == voter_id {
            return Err(DomainError::SelfVote);
        }

        let (state, tally) = self.votes.cast(comment_id, voter_id, is_upvote).await?;
        Ok(VoteResult {
            vote: state,
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
            net_score: tally.net_score(),
        })
    }
}
