use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use domain::VoteResult;

use crate::api::handlers::require_user;
use crate::error::AppResult;
use crate::models::VotePayload;
use crate::state::AppState;

/// Cast, toggle, or switch a vote
#[utoipa::path(
    post,
    path = "/api/comments/{id}/vote",
    tag = "votes",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    request_body = VotePayload,
    responses(
        (status = 200, description = "Resulting vote state and counters", body = VoteResult),
        (status = 400, description = "Voting on your own comment"),
        (status = 401, description = "Missing user identity"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<VotePayload>,
) -> AppResult<Json<VoteResult>> {
    let voter_id = require_user(&headers)?;
    let result = state.votes.cast(id, voter_id, payload.is_upvote).await?;
    Ok(Json(result))
}
