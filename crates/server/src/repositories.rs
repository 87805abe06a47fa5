mod catalog;
mod comment;
mod notification;
mod user;
mod vote;

pub use catalog::SqliteContextValidator;
pub use comment::SqliteCommentRepository;
pub use notification::{Notification, NotificationRepository, SqliteNotificationSink};
pub use user::{SqliteAuthorityResolver, SqliteXpService, User, UserRepository};
pub use vote::SqliteVoteRepository;

use domain::DomainError;

/// Map a database error into the opaque persistence variant.
pub(crate) fn persistence(e: sqlx::Error) -> DomainError {
    DomainError::Persistence(e.to_string())
}
