//! Vote ledger repository trait.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{Vote, VoteState, VoteTally};
use crate::error::DomainResult;

/// Vote ledger repository trait.
///
/// Implementations must execute [`cast`](VoteRepository::cast) as a
/// single serializable unit per (voter, comment) pair: the read of the
/// existing row, the row mutation, and the counter adjustment either
/// all happen or none do, and concurrent casts never lose updates or
/// drive a counter negative.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Atomically apply one vote request, returning the voter's new
    /// state and the comment's updated counters.
    ///
    /// The comment is assumed to exist; services check existence and
    /// the self-vote rule before calling.
    async fn cast(
        &self,
        comment_id: i64,
        voter_id: i64,
        is_upvote: bool,
    ) -> DomainResult<(VoteState, VoteTally)>;

    /// Fetch the ledger row for a (voter, comment) pair.
    async fn find(&self, voter_id: i64, comment_id: i64) -> DomainResult<Option<Vote>>;

    /// The voter's current state on each of the given comments.
    /// Comments without a ledger row are absent from the map.
    async fn states_for(
        &self,
        voter_id: i64,
        comment_ids: &[i64],
    ) -> DomainResult<HashMap<i64, VoteState>>;
}
