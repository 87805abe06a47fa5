use axum::{extract::State, http::HeaderMap, Json};

use crate::api::handlers::require_user;
use crate::error::AppResult;
use crate::repositories::{Notification, NotificationRepository};
use crate::state::AppState;

const NOTIFICATION_PAGE: i64 = 50;

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "The caller's notifications", body = Vec<Notification>),
        (status = 401, description = "Missing user identity"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Notification>>> {
    let user_id = require_user(&headers)?;
    let notifications =
        NotificationRepository::list_for_user(&state.db, user_id, NOTIFICATION_PAGE).await?;
    Ok(Json(notifications))
}

/// Mark all of the caller's notifications read
#[utoipa::path(
    post,
    path = "/api/notifications/read",
    tag = "notifications",
    responses(
        (status = 200, description = "Notifications marked read"),
        (status = 401, description = "Missing user identity"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mark_notifications_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = require_user(&headers)?;
    let updated = NotificationRepository::mark_all_read(&state.db, user_id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
