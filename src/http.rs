//! `/ai` routes over the intelligence service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::IntelligenceService;
use crate::catalog::VideoCatalog;
use crate::error::IntelligenceError;
use crate::models::{QuizQuestion, SummaryResult};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IntelligenceService>,
    pub catalog: Arc<dyn VideoCatalog>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub topic: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Accepted for client compatibility; the feed depends only on `recent_tags`
    pub user_id: Option<String>,
    #[serde(default)]
    pub recent_tags: Vec<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub video_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Route-level errors with HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, "VALIDATION", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<IntelligenceError> for ApiError {
    fn from(err: IntelligenceError) -> Self {
        match err {
            IntelligenceError::Validation(detail) => ApiError::Validation(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ai/generate-summary", post(create_summary))
        .route("/ai/generate-quiz", post(create_quiz))
        .route("/ai/recommend-feed", post(recommend_feed))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

async fn create_summary(
    State(state): State<AppState>,
    Json(payload): Json<SummaryRequest>,
) -> Result<Json<SummaryResult>, ApiError> {
    let result = state
        .service
        .summarize(&payload.title, &payload.tags, payload.transcript.as_deref())
        .await?;
    Ok(Json(result))
}

async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = state
        .service
        .generate_quiz(&payload.topic, &payload.tags)
        .await?;
    Ok(Json(QuizResponse {
        questions: quiz.questions,
    }))
}

async fn recommend_feed(
    State(state): State<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let limit = payload
        .limit
        .map(|l| {
            usize::try_from(l)
                .map_err(|_| ApiError::Validation("limit must be at least 1".to_string()))
        })
        .transpose()?;

    let candidates = state.catalog.candidates().await?;
    let feed = state
        .service
        .recommend(&candidates, &payload.recent_tags, limit)
        .await?;

    Ok(Json(RecommendationResponse {
        video_ids: feed.video_ids,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MockVideoCatalog, SeedCatalog};
    use crate::config::Config;
    use crate::models::VideoCandidate;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with(catalog: Arc<dyn VideoCatalog>) -> Router {
        router(AppState {
            service: Arc::new(IntelligenceService::new(&Config::default())),
            catalog,
        })
    }

    fn app() -> Router {
        let catalog = SeedCatalog::new(vec![
            VideoCandidate::new("A", "Neural nets", &["ai", "ml"], 1000, 100),
            VideoCandidate::new("B", "Pasta", &["cooking"], 10, 1),
        ])
        .expect("valid catalog");
        app_with(Arc::new(catalog))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summary_route() {
        let req = post_json(
            "/ai/generate-summary",
            json!({"title": "Intro to Neural Nets", "tags": ["ai", "ml"]}),
        );
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body["summary"],
            "Intro to Neural Nets covers ai, ml in under 90 seconds."
        );
        assert_eq!(body["key_points"], json!(["Key idea: ai", "Key idea: ml"]));
    }

    #[tokio::test]
    async fn test_summary_route_rejects_blank_title() {
        let req = post_json("/ai/generate-summary", json!({"title": " ", "tags": []}));
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_quiz_route() {
        let req = post_json("/ai/generate-quiz", json!({"topic": "Big O", "tags": []}));
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(body["questions"][0]["answer"], "Application");
    }

    #[tokio::test]
    async fn test_recommend_route() {
        let req = post_json(
            "/ai/recommend-feed",
            json!({"user_id": null, "recent_tags": ["ai"], "limit": 2}),
        );
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["video_ids"], json!(["A", "B"]));
    }

    #[tokio::test]
    async fn test_recommend_route_rejects_bad_limits() {
        for limit in [0, -3] {
            let req = post_json("/ai/recommend-feed", json!({"recent_tags": [], "limit": limit}));
            let response = app().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_recommend_route_catalog_failure() {
        let mut catalog = MockVideoCatalog::new();
        catalog
            .expect_candidates()
            .times(1)
            .returning(|| Err(IntelligenceError::Catalog("database unavailable".to_string())));

        let req = post_json("/ai/recommend-feed", json!({"recent_tags": ["ai"]}));
        let response = app_with(Arc::new(catalog)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL");
    }
}
