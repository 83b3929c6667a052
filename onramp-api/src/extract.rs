//! Request extractors
//!
//! axum's stock `Json` rejection answers a malformed body with a 422 and a
//! plain-text message. Every error on this API's wire is
//! `{"error": true, "message": "..."}`, so body extraction goes through
//! this wrapper, which turns the rejection into a 400 with the envelope.

use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// Drop-in replacement for `axum::Json` whose rejection is an `ApiError`
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::put;
    use axum::Router;
    use onramp_common::QuotaRequest;
    use tower::ServiceExt;

    async fn echo(Json(request): Json<QuotaRequest>) -> Json<QuotaRequest> {
        Json(request)
    }

    fn app() -> Router {
        Router::new().route("/quotas", put(echo))
    }

    fn put_body(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/quotas")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fractional_multiplier_is_bad_request_with_envelope() {
        let response = app().oneshot(put_body(r#"{"multiplier": 1.5}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.error);
        assert!(body.message.contains("multiplier"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request_with_envelope() {
        let response = app().oneshot(put_body("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.error);
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let response = app().oneshot(put_body(r#"{"multiplier": 2}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
