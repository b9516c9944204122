use super::handlers::{comments, flags, health, posts, votes};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/flag-reasons", get(flags::flag_reasons))
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/posts/:id/vote", post(votes::vote_on_post))
        .route("/api/posts/:id/votes", get(votes::post_votes))
        .route("/api/posts/:id/flag", post(flags::flag_post))
        .route("/api/comments/:id/vote", post(votes::vote_on_comment))
        .route("/api/comments/:id/votes", get(votes::comment_votes))
        .route("/api/comments/:id/flag", post(flags::flag_comment))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionBudget, LimitSettings};
    use crate::identity::ActorResolver;
    use crate::ratelimit::RateGuard;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use storage::Db;
    use tower::ServiceExt;

    fn limits(budget: u32) -> LimitSettings {
        let b = ActionBudget {
            budget,
            window_secs: 60,
        };
        LimitSettings {
            vote: b,
            comment: b,
            post: b,
            flag: b,
        }
    }

    async fn test_app(budget: u32) -> Router {
        let db = Db::new_in_memory().await.unwrap();
        let state = AppState {
            db,
            limiter: RateGuard::new(limits(budget)),
            resolver: ActorResolver::new("test-salt"),
        };
        build_router(state, "*")
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        ip: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ip) = ip {
            builder = builder.header("x-forwarded-for", ip);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_post(app: &Router, ip: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/posts",
            Some(json!({ "title": "a title", "content": "long enough post content" })),
            Some(ip),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_answers() {
        let app = test_app(100).await;
        let (status, body) = send(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn post_lifecycle_over_http() {
        let app = test_app(100).await;
        let id = create_post(&app, "9.9.9.9").await;

        let (status, body) = send(&app, "GET", "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], Value::from(id));
    }

    #[tokio::test]
    async fn short_content_is_rejected_with_kind() {
        let app = test_app(100).await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/posts",
            Some(json!({ "title": "t", "content": "too short" })),
            Some("9.9.9.9"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn missing_origin_fails_closed_on_mutations() {
        let app = test_app(100).await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/posts",
            Some(json!({ "title": "t", "content": "long enough post content" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn vote_toggles_and_transitions_over_http() {
        let app = test_app(100).await;
        let id = create_post(&app, "9.9.9.9").await;
        let uri = format!("/api/posts/{id}/vote");
        let ip = Some("10.1.1.1");

        let (status, body) = send(&app, "POST", &uri, Some(json!({"vote_type": "upvote"})), ip).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["upvotes"], 1);
        assert_eq!(body["user_vote"], "upvote");

        // 同向重投 => 回到中立
        let (_, body) = send(&app, "POST", &uri, Some(json!({"vote_type": "upvote"})), ip).await;
        assert_eq!(body["upvotes"], 0);
        assert_eq!(body["user_vote"], "none");

        // 换方向一步到位
        send(&app, "POST", &uri, Some(json!({"vote_type": "upvote"})), ip).await;
        let (_, body) = send(&app, "POST", &uri, Some(json!({"vote_type": "downvote"})), ip).await;
        assert_eq!(body["upvotes"], 0);
        assert_eq!(body["downvotes"], 1);
        assert_eq!(body["score"], -1);

        let (status, body) = send(&app, "GET", &format!("/api/posts/{id}/votes"), None, ip).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_vote"], "downvote");
    }

    #[tokio::test]
    async fn invalid_vote_type_is_rejected() {
        let app = test_app(100).await;
        let id = create_post(&app, "9.9.9.9").await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/posts/{id}/vote"),
            Some(json!({"vote_type": "sideways"})),
            Some("10.1.1.1"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn vote_budget_exhaustion_returns_429_and_mutates_nothing() {
        let app = test_app(2).await;
        let id = create_post(&app, "9.9.9.9").await;
        let uri = format!("/api/posts/{id}/vote");
        let ip = Some("10.2.2.2");

        send(&app, "POST", &uri, Some(json!({"vote_type": "upvote"})), ip).await;
        send(&app, "POST", &uri, Some(json!({"vote_type": "downvote"})), ip).await;

        let (status, body) = send(&app, "POST", &uri, Some(json!({"vote_type": "upvote"})), ip).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["kind"], "rate_limited");

        // 被拒的尝试没有碰到账本
        let (_, body) = send(&app, "GET", &format!("/api/posts/{id}/votes"), None, ip).await;
        assert_eq!(body["downvotes"], 1);
        assert_eq!(body["user_vote"], "downvote");
    }

    #[tokio::test]
    async fn comments_over_http() {
        let app = test_app(100).await;
        let id = create_post(&app, "9.9.9.9").await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/posts/{id}/comments"),
            Some(json!({"content": "a perfectly fine comment"})),
            Some("10.3.3.3"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["post_id"], Value::from(id.clone()));

        let (status, body) = send(&app, "GET", &format!("/api/posts/{id}/comments"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/posts/{}/comments", uuid::Uuid::new_v4()),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn flag_flow_over_http() {
        let app = test_app(100).await;
        let id = create_post(&app, "9.9.9.9").await;
        let uri = format!("/api/posts/{id}/flag");

        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(json!({"reason": "spam"})),
            Some("10.4.4.4"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &uri,
            Some(json!({"reason": "harassment"})),
            Some("10.4.4.4"),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");

        // 其他 actor 不受影响
        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(json!({"reason": "spam"})),
            Some("10.4.4.5"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &uri,
            Some(json!({"reason": "other", "details": "   "})),
            Some("10.4.4.6"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn flag_reasons_lists_the_closed_set() {
        let app = test_app(100).await;
        let (status, body) = send(&app, "GET", "/api/flag-reasons", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let reasons = body["reasons"].as_object().unwrap();
        assert_eq!(reasons.len(), 6);
        assert!(reasons.contains_key("hate_speech"));
        assert!(reasons.contains_key("other"));
    }
}
