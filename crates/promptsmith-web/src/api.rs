//! REST API endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptsmith::{EnhanceError, EnhanceRequest, Enhancement, Enhancer, Preview};
use serde_json::{Value, json};
use tracing::{error, warn};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub enhancer: Arc<Enhancer>,
}

/// Error returned by every handler, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Enhance(#[from] EnhanceError),

    #[error("invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Enhance(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Enhance(EnhanceError::GuideNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Enhance(EnhanceError::Completion(_)) => StatusCode::BAD_GATEWAY,
            Self::Enhance(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{status}: {self}");
        } else {
            warn!("{status}: {self}");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// POST /api/enhance: Enhance a prompt for a platform.
pub async fn post_enhance(
    State(app): State<AppState>,
    body: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<Enhancement>, ApiError> {
    let Json(request) = body?;
    Ok(Json(app.enhancer.enhance(&request).await?))
}

/// POST /api/instruction: Build the instruction without calling the
/// completion backend.
pub async fn post_instruction(
    State(app): State<AppState>,
    body: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<Preview>, ApiError> {
    let Json(request) = body?;
    Ok(Json(app.enhancer.preview(&request).await?))
}

/// GET /api/platforms: Platforms with a guide.
pub async fn get_platforms(State(app): State<AppState>) -> Result<Json<Value>, ApiError> {
    let platforms = app.enhancer.platforms().await?;
    Ok(Json(json!({ "platforms": platforms })))
}

/// GET /api/health: liveness check.
pub async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsmith::error::{CompletionError, GuideError};

    #[test]
    fn validation_errors_are_bad_request() {
        assert_eq!(
            ApiError::from(EnhanceError::MissingPlatform).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(EnhanceError::MissingRequest).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unknown_platform_is_not_found() {
        let err = ApiError::from(EnhanceError::GuideNotFound("x".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "no guide found for platform: x");
    }

    #[test]
    fn store_failure_is_internal_error() {
        let err = ApiError::from(EnhanceError::Guide(GuideError::Parse {
            path: "guides/x.json".into(),
            source: serde_json::from_str::<Value>("{").unwrap_err(),
        }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn completion_failure_is_bad_gateway() {
        let err = ApiError::from(EnhanceError::Completion(CompletionError::EmptyResponse));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
