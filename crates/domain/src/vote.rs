//! Vote aggregate: ledger entity, atomic transition planning, repository trait.

mod entity;
mod repository;
mod transition;

pub use entity::{Vote, VoteState, VoteTally};
pub use repository::VoteRepository;
pub use transition::{VoteLedgerOp, VoteTransition};
