//! Comment aggregate: entity, context, validated requests, repository trait.

mod context;
mod entity;
mod repository;
mod request;

pub use context::{CommentContext, ContextKind, InvalidContextError};
pub use entity::{Comment, DELETED_PLACEHOLDER};
pub use repository::{CommentRepository, NewComment, ThreadScope};
pub use request::{CreateCommentError, CreateCommentRequest, EditCommentRequest};
