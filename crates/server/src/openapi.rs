use utoipa::OpenApi;

use crate::api::handlers::{comments, moderation, notifications, votes};
use crate::models::{
    CommentListResponse, CreateCommentPayload, CreateCommentResponse, ModeratePayload,
    ModerateResponse, UpdateCommentPayload, VotePayload,
};
use crate::repositories::Notification;
use domain::{
    Comment, CommentContext, DeleteResult, ListedComment, ModerationAction, Pagination, Role,
    SortOrder, ViewerContext, VoteResult, VoteState,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comment Engine API",
        version = "1.0.0"
    ),
    paths(
        comments::list_comments,
        comments::create_comment,
        comments::update_comment,
        comments::delete_comment,
        votes::cast_vote,
        moderation::moderate_comment,
        notifications::list_notifications,
        notifications::mark_notifications_read
    ),
    tags(
        (name = "comments", description = "Threaded comment endpoints"),
        (name = "votes", description = "Vote ledger endpoints"),
        (name = "moderation", description = "Moderation endpoints"),
        (name = "notifications", description = "Notification endpoints")
    ),
    components(schemas(
        Comment,
        CommentContext,
        ListedComment,
        ViewerContext,
        Pagination,
        SortOrder,
        Role,
        VoteState,
        VoteResult,
        DeleteResult,
        ModerationAction,
        Notification,
        CommentListResponse,
        CreateCommentPayload,
        CreateCommentResponse,
        UpdateCommentPayload,
        VotePayload,
        ModeratePayload,
        ModerateResponse
    ))
)]
pub struct ApiDoc;
