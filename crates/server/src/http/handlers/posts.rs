use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use domain::{NewPost, Post};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::identity::ClientIp;
use crate::ratelimit::ActionClass;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<i64>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let limit = match query.limit {
        Some(l) if (1..=100).contains(&l) => l,
        _ => 50,
    };
    Ok(Json(state.db.list_posts(limit).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let actor = state.resolver.resolve(ip);
    state.limiter.enforce(&actor, ActionClass::PostCreate)?;

    let new = NewPost::new(payload.title, payload.content)?;
    let post = state.db.create_post(new).await?;
    Ok((StatusCode::CREATED, Json(post)))
}
