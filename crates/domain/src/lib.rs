//! Domain layer for moetalk.
//!
//! This crate contains the core business logic for the threaded comment,
//! voting and ranking engine. It is designed to be independent of external
//! concerns like databases, web frameworks, or notification transports.
//!
//! # Module Structure
//!
//! Each domain module contains:
//! - **Entity**: Core business object with identity
//! - **Repository**: Abstract interface for data persistence (trait only)
//! - **Request**: Validated creation request with specific error types
//!
//! Business services live in [`services`] and talk to persistence and
//! external collaborators (context catalog, XP, notifications, roles)
//! exclusively through traits, so they can be exercised against the
//! in-memory mocks in `services::mocks`.

pub mod comment;
pub mod error;
pub mod moderation;
pub mod ranking;
pub mod role;
pub mod services;
pub mod vote;

// Re-exports for convenience
pub use comment::{
    Comment, CommentContext, CommentRepository, ContextKind, CreateCommentError,
    CreateCommentRequest, EditCommentRequest, NewComment, ThreadScope, DELETED_PLACEHOLDER,
};
pub use error::{DomainError, DomainResult};
pub use moderation::ModerationAction;
pub use ranking::{
    controversy_score, hot_score, PageRequest, Pagination, RankedPage, SortOrder,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use role::Role;
pub use services::{
    AuthorityResolver, CommentService, ContextValidator, DeleteResult, HookDispatcher,
    HookMessage, ListedComment, ListingService, ModerationOutcome, ModerationService,
    NotificationKind, NotificationSink, ViewerContext, VoteResult, VoteService, XpService,
    DEFAULT_HOOK_CAPACITY, XP_REPLY_COMMENT, XP_ROOT_COMMENT,
};
pub use vote::{Vote, VoteLedgerOp, VoteRepository, VoteState, VoteTally, VoteTransition};
