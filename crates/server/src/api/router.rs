use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::api::handlers::{comments, moderation, notifications, votes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/{id}",
            axum::routing::patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/api/comments/{id}/vote", post(votes::cast_vote))
        .route(
            "/api/comments/{id}/moderate",
            post(moderation::moderate_comment),
        )
        .route(
            "/api/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/read",
            post(notifications::mark_notifications_read),
        )
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
}
