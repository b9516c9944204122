use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, NewComment};
use serde::Deserialize;

use super::parse_id;
use crate::http::error::ApiError;
use crate::identity::ClientIp;
use crate::ratelimit::ActionClass;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    Ok(Json(state.db.list_comments(post_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post_id = parse_id(&post_id, "post")?;

    let actor = state.resolver.resolve(ip);
    state.limiter.enforce(&actor, ActionClass::CommentCreate)?;

    let new = NewComment::new(payload.content)?;
    let comment = state.db.create_comment(post_id, new).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
