use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::AppError;
use serde::Serialize;

/// 引擎错误到 HTTP 的统一出口
pub struct ApiError(AppError);

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let (status, error) = match &self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.0.to_string()),
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, self.0.to_string()),
            AppError::Internal(detail) => {
                // 细节只进日志,响应里不暴露存储内部
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal service error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { kind, error })).into_response()
    }
}
