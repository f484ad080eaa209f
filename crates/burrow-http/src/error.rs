use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::envelope::RequestInfo;

/// HTTP-facing error taxonomy, mapped 1:1 from [`burrow_bus::BurrowError`] plus the router's own
/// 404 path (`spec.md` §7, `SPEC_FULL.md` §7).
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Busy,
    ShuttingDown,
    Encoding,
    InvalidRequest,
}

impl From<burrow_bus::BurrowError> for ApiError {
    fn from(err: burrow_bus::BurrowError) -> Self {
        match err {
            burrow_bus::BurrowError::NotFound => ApiError::NotFound,
            burrow_bus::BurrowError::Busy => ApiError::Busy,
            burrow_bus::BurrowError::ShuttingDown => ApiError::ShuttingDown,
            burrow_bus::BurrowError::EncodingError => ApiError::Encoding,
            burrow_bus::BurrowError::Internal(_) => ApiError::Encoding,
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            ApiError::Busy => (StatusCode::SERVICE_UNAVAILABLE, "store is busy"),
            ApiError::ShuttingDown => (StatusCode::SERVICE_UNAVAILABLE, "shutting down"),
            ApiError::Encoding => (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response"),
            ApiError::InvalidRequest => (StatusCode::NOT_FOUND, "invalid request type"),
        }
    }

    /// Used by the router's fallback handler, which has no [`RequestInfo`] extracted yet.
    pub fn into_response_with(self, request: RequestInfo) -> Response {
        let (status, message) = self.status_and_message();
        let body = serde_json::json!({
            "error": true,
            "message": message,
            "request": request,
            "result": {},
        });
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(RequestInfo { uri: String::new(), host: String::new() })
    }
}
