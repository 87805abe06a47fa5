//! Vote state machine.
//!
//! Planning a transition is pure: given the voter's existing ledger row
//! and the requested direction, it yields the ledger operation, the
//! counter deltas, and the resulting state. Repositories execute the
//! plan as one atomic unit per (voter, comment) pair.

use super::VoteState;

/// Ledger mutation a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteLedgerOp {
    /// No existing row: insert one with the requested direction.
    Insert { is_upvote: bool },
    /// Same direction cast again: remove the row (toggle-off).
    Remove,
    /// Opposite direction: flip the row's direction.
    Flip { is_upvote: bool },
}

/// A planned vote transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub op: VoteLedgerOp,
    pub upvote_delta: i64,
    pub downvote_delta: i64,
    pub new_state: VoteState,
}

impl VoteTransition {
    /// Plan the transition for a requested vote direction given the
    /// existing ledger row (if any).
    pub fn plan(existing: Option<bool>, is_upvote: bool) -> Self {
        match existing {
            None => Self {
                op: VoteLedgerOp::Insert { is_upvote },
                upvote_delta: i64::from(is_upvote),
                downvote_delta: i64::from(!is_upvote),
                new_state: VoteState::from_ledger(Some(is_upvote)),
            },
            Some(current) if current == is_upvote => Self {
                op: VoteLedgerOp::Remove,
                upvote_delta: -i64::from(is_upvote),
                downvote_delta: -i64::from(!is_upvote),
                new_state: VoteState::Neutral,
            },
            Some(_) => Self {
                op: VoteLedgerOp::Flip { is_upvote },
                // One counter gains what the other loses, in one unit.
                upvote_delta: if is_upvote { 1 } else { -1 },
                downvote_delta: if is_upvote { -1 } else { 1 },
                new_state: VoteState::from_ledger(Some(is_upvote)),
            },
        }
    }
}
