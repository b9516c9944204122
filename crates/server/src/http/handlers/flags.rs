use axum::{
    extract::{Path, State},
    Json,
};
use domain::{FlagReason, FlagSubmission, TargetType};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_id;
use crate::http::error::ApiError;
use crate::identity::ClientIp;
use crate::ratelimit::ActionClass;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FlagRequest {
    pub reason: String,
    pub details: Option<String>,
}

pub async fn flag_post(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
    payload: Json<FlagRequest>,
) -> Result<Json<Value>, ApiError> {
    submit(state, TargetType::Post, path.0, ip, payload.0).await
}

pub async fn flag_comment(
    state: State<AppState>,
    path: Path<String>,
    ip: ClientIp,
    payload: Json<FlagRequest>,
) -> Result<Json<Value>, ApiError> {
    submit(state, TargetType::Comment, path.0, ip, payload.0).await
}

async fn submit(
    State(state): State<AppState>,
    target: TargetType,
    raw_id: String,
    ClientIp(ip): ClientIp,
    payload: FlagRequest,
) -> Result<Json<Value>, ApiError> {
    let target_id = parse_id(&raw_id, target.as_str())?;

    let actor = state.resolver.resolve(ip);
    state.limiter.enforce(&actor, ActionClass::Flag)?;

    let submission = FlagSubmission::new(&payload.reason, payload.details)?;
    state
        .db
        .submit_flag(target, target_id, &actor, submission)
        .await?;

    Ok(Json(json!({
        "message": format!("{} flagged successfully", target.as_str())
    })))
}

/// 只读的 reason 清单,给前端渲染举报表单
pub async fn flag_reasons() -> Json<Value> {
    let reasons: serde_json::Map<String, Value> = FlagReason::ALL
        .into_iter()
        .map(|r| (r.as_str().to_string(), Value::from(r.label())))
        .collect();
    Json(json!({ "reasons": reasons }))
}
