use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::dtos::requests::CreateCommentRequest;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.comments
        .create_comment(&payload.event_id, &payload.author_id, payload.content, payload.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let threads = state.comments.list_root_comments(&event_id).await?;
    Ok(Json(threads))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((comment_id, caller_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.comments.delete_comment(&comment_id, &caller_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
