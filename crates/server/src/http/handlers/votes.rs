use axum::{
    extract::{Path, State},
    Json,
};
use domain::{TargetType, VoteAggregate, VoteState};
use serde::Deserialize;

use super::parse_id;
use crate::http::error::ApiError;
use crate::identity::ClientIp;
use crate::ratelimit::ActionClass;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VoteRequest {
    pub vote_type: String,
}

pub async fn vote_on_post(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
    payload: Json<VoteRequest>,
) -> Result<Json<VoteAggregate>, ApiError> {
    cast(state, TargetType::Post, path.0, ip, payload.0).await
}

pub async fn vote_on_comment(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
    payload: Json<VoteRequest>,
) -> Result<Json<VoteAggregate>, ApiError> {
    cast(state, TargetType::Comment, path.0, ip, payload.0).await
}

pub async fn post_votes(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
) -> Result<Json<VoteAggregate>, ApiError> {
    fetch(state, TargetType::Post, path.0, ip).await
}

pub async fn comment_votes(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
) -> Result<Json<VoteAggregate>, ApiError> {
    fetch(state, TargetType::Comment, path.0, ip).await
}

async fn cast(
    State(state): State<AppState>,
    target: TargetType,
    raw_id: String,
    ClientIp(ip): ClientIp,
    payload: VoteRequest,
) -> Result<Json<VoteAggregate>, ApiError> {
    let target_id = parse_id(&raw_id, target.as_str())?;

    let actor = state.resolver.resolve(ip);
    state.limiter.enforce(&actor, ActionClass::Vote)?;

    let requested = VoteState::parse_request(&payload.vote_type)?;
    let aggregate = state
        .db
        .apply_vote(target, target_id, &actor, requested)
        .await?;
    Ok(Json(aggregate))
}

/// 读路径:不过限流,不产生任何副作用
async fn fetch(
    State(state): State<AppState>,
    target: TargetType,
    raw_id: String,
    ClientIp(ip): ClientIp,
) -> Result<Json<VoteAggregate>, ApiError> {
    let target_id = parse_id(&raw_id, target.as_str())?;
    let actor = state.resolver.resolve(ip);
    let aggregate = state.db.vote_aggregate(target, target_id, &actor).await?;
    Ok(Json(aggregate))
}
