use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use domain::{
    Comment, CommentContext, CreateCommentRequest, DeleteResult, EditCommentRequest, PageRequest,
    SortOrder, DEFAULT_PAGE_LIMIT,
};

use crate::api::handlers::{optional_user, require_user};
use crate::error::{AppError, AppResult};
use crate::models::{
    CommentListResponse, CreateCommentPayload, CreateCommentResponse, ListCommentsQuery,
    UpdateCommentPayload,
};
use crate::state::AppState;

fn context_from_parts(
    anime_id: Option<i64>,
    manga_id: Option<i64>,
    chapter_id: Option<i64>,
    episode_id: Option<i64>,
) -> AppResult<CommentContext> {
    CommentContext::new(anime_id, manga_id, chapter_id, episode_id)
        .map_err(|e| AppError::bad_request(e.to_string()))
}

/// List one thread level, ranked and paginated
#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "comments",
    params(ListCommentsQuery),
    responses(
        (status = 200, description = "Ranked page of comments", body = CommentListResponse),
        (status = 400, description = "Invalid context, sort, or page"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<Json<CommentListResponse>> {
    let viewer_id = optional_user(&headers)?;
    let context = context_from_parts(
        query.anime_id,
        query.manga_id,
        query.chapter_id,
        query.episode_id,
    )?;
    let order: SortOrder = query.sort.as_deref().unwrap_or("hot").parse()?;
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    )?;

    let (items, pagination) = state
        .listing
        .list(context, query.parent_id, order, page, viewer_id)
        .await?;

    Ok(Json(CommentListResponse { items, pagination }))
}

/// Post a comment or a reply
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    request_body = CreateCommentPayload,
    responses(
        (status = 201, description = "Comment created", body = CreateCommentResponse),
        (status = 400, description = "Invalid context or content"),
        (status = 401, description = "Missing user identity"),
        (status = 404, description = "Context entity or parent not found"),
        (status = 409, description = "Reply context differs from parent"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCommentPayload>,
) -> AppResult<(StatusCode, Json<CreateCommentResponse>)> {
    let author_id = require_user(&headers)?;
    let context = context_from_parts(
        payload.anime_id,
        payload.manga_id,
        payload.chapter_id,
        payload.episode_id,
    )?;
    let request = CreateCommentRequest::new(
        author_id,
        context,
        payload.parent_id,
        &payload.content,
        payload.is_spoiler,
    )
    .map_err(|e| AppError::bad_request(e.to_string()))?;

    let (comment, xp_awarded) = state.comments.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCommentResponse { comment, xp_awarded }),
    ))
}

/// Edit a comment's content or spoiler flag
#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    request_body = UpdateCommentPayload,
    responses(
        (status = 200, description = "Updated comment", body = Comment),
        (status = 401, description = "Missing user identity"),
        (status = 403, description = "Caller is neither author nor moderator"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentPayload>,
) -> AppResult<Json<Comment>> {
    let actor_id = require_user(&headers)?;
    let request = EditCommentRequest::new(payload.content.as_deref(), payload.is_spoiler)
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    let comment = state.comments.edit(id, actor_id, request).await?;
    Ok(Json(comment))
}

/// Delete a comment (soft when it has replies, hard otherwise)
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteResult),
        (status = 401, description = "Missing user identity"),
        (status = 403, description = "Caller is neither author nor moderator"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResult>> {
    let actor_id = require_user(&headers)?;
    let result = state.comments.delete(id, actor_id).await?;
    Ok(Json(result))
}
