//! Vote ledger entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// One row of the vote ledger. Identity is the (user, comment) pair;
/// at most one row exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: i64,
    pub comment_id: i64,
    pub is_upvote: bool,
    pub created_at: DateTime<Utc>,
}

/// A user's vote state on a comment, as seen by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    Upvoted,
    Downvoted,
    #[default]
    Neutral,
}

impl VoteState {
    pub fn from_ledger(is_upvote: Option<bool>) -> Self {
        match is_upvote {
            Some(true) => VoteState::Upvoted,
            Some(false) => VoteState::Downvoted,
            None => VoteState::Neutral,
        }
    }
}

/// Counters of a comment after a ledger mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}
