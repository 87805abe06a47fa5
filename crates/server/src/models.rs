use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use domain::{Comment, DeleteResult, ListedComment, ModerationAction, Pagination};

/// Query parameters for listing one thread level.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    pub anime_id: Option<i64>,
    pub manga_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub episode_id: Option<i64>,
    /// List direct replies to this comment instead of root comments.
    pub parent_id: Option<i64>,
    /// One of hot, new, top, controversial. Defaults to hot.
    pub sort: Option<String>,
    /// 1-indexed page. Defaults to 1.
    pub page: Option<u32>,
    /// Page size, clamped server-side. Defaults to 20.
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    pub anime_id: Option<i64>,
    pub manga_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub episode_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub is_spoiler: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentPayload {
    pub content: Option<String>,
    pub is_spoiler: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub is_upvote: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModeratePayload {
    /// One of hide, approve, delete.
    pub action: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    pub items: Vec<ListedComment>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentResponse {
    pub comment: Comment,
    pub xp_awarded: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerateResponse {
    pub action: ModerationAction,
    /// Present after hide and approve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    /// Present after delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DeleteResult>,
}
