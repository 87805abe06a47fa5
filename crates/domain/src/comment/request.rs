//! Validated comment requests.

use thiserror::Error;

use super::CommentContext;

/// Content length bounds, in characters.
pub const MIN_CONTENT_LEN: usize = 1;
pub const MAX_CONTENT_LEN: usize = 5000;

/// Error when building a comment request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateCommentError {
    /// Content is empty after trimming.
    #[error("Comment content cannot be empty")]
    EmptyContent,
    /// Content exceeds the maximum length.
    #[error("Comment content cannot exceed {MAX_CONTENT_LEN} characters")]
    ContentTooLong,
}

fn validate_content(content: &str) -> Result<String, CreateCommentError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CreateCommentError::EmptyContent);
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(CreateCommentError::ContentTooLong);
    }
    Ok(content.to_string())
}

/// Request to create a new comment.
#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub author_id: i64,
    pub context: CommentContext,
    pub parent_id: Option<i64>,
    pub content: String,
    pub is_spoiler: bool,
}

impl CreateCommentRequest {
    /// Create a new request with content validation.
    pub fn new(
        author_id: i64,
        context: CommentContext,
        parent_id: Option<i64>,
        content: &str,
        is_spoiler: bool,
    ) -> Result<Self, CreateCommentError> {
        Ok(Self {
            author_id,
            context,
            parent_id,
            content: validate_content(content)?,
            is_spoiler,
        })
    }
}

/// Request to edit an existing comment. Either field may be omitted;
/// an omitted field is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EditCommentRequest {
    pub content: Option<String>,
    pub is_spoiler: Option<bool>,
}

impl EditCommentRequest {
    pub fn new(
        content: Option<&str>,
        is_spoiler: Option<bool>,
    ) -> Result<Self, CreateCommentError> {
        let content = content.map(validate_content).transpose()?;
        Ok(Self {
            content,
            is_spoiler,
        })
    }
}
