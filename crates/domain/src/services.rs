//! Business services.
//!
//! Services orchestrate the repositories and external collaborators.
//! Every dependency is a trait, so the services can be exercised against
//! the in-memory implementations in [`mocks`].

mod comments;
mod hooks;
mod listing;
mod moderation;
pub mod mocks;
mod traits;
mod votes;

pub use comments::{CommentService, DeleteResult, XP_REPLY_COMMENT, XP_ROOT_COMMENT};
pub use hooks::{HookDispatcher, HookMessage, DEFAULT_HOOK_CAPACITY};
pub use listing::{ListedComment, ListingService, ViewerContext};
pub use moderation::{ModerationOutcome, ModerationService};
pub use traits::{AuthorityResolver, ContextValidator, NotificationKind, NotificationSink, XpService};
pub use votes::{VoteResult, VoteService};
