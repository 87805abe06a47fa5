use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use domain::{ModerationAction, ModerationOutcome};

use crate::api::handlers::require_user;
use crate::error::AppResult;
use crate::models::{ModeratePayload, ModerateResponse};
use crate::state::AppState;

/// Hide, approve, or delete a comment as a moderator
#[utoipa::path(
    post,
    path = "/api/comments/{id}/moderate",
    tag = "moderation",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    request_body = ModeratePayload,
    responses(
        (status = 200, description = "Moderation outcome", body = ModerateResponse),
        (status = 400, description = "Unknown moderation action"),
        (status = 401, description = "Missing user identity"),
        (status = 403, description = "Caller lacks moderation authority"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn moderate_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ModeratePayload>,
) -> AppResult<Json<ModerateResponse>> {
    let actor_id = require_user(&headers)?;
    let action: ModerationAction = payload.action.parse()?;

    let response = match state.moderation.moderate(id, actor_id, action).await? {
        ModerationOutcome::Updated(comment) => ModerateResponse {
            action,
            comment: Some(comment),
            deleted: None,
        },
        ModerationOutcome::Deleted(result) => ModerateResponse {
            action,
            comment: None,
            deleted: Some(result),
        },
    };

    Ok(Json(response))
}
