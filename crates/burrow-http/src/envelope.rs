use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Per-request metadata echoed back in every envelope (`spec.md` §6: `request:{uri,host}`).
#[derive(Clone, Debug, Serialize)]
pub struct RequestInfo {
    pub uri: String,
    pub host: String,
}

/// The JSON envelope every successful response is wrapped in:
/// `{error:false, message:"...", request:{uri,host}, ...payload}` (`spec.md` §6). The payload's
/// fields are flattened to the top level, matching the literal `...payload` in the spec's shape.
pub struct Envelope<T: Serialize> {
    pub message: String,
    pub request: RequestInfo,
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(request: RequestInfo, payload: T) -> Self {
        Envelope { message: "ok".to_string(), request, payload }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let Ok(mut payload) = serde_json::to_value(&self.payload) else {
            return crate::error::ApiError::Encoding.into_response();
        };
        let mut body = serde_json::json!({
            "error": false,
            "message": self.message,
            "request": self.request,
        });
        // Scalars and arrays (e.g. the topic/group list endpoints) are reported under "result";
        // object payloads are flattened to the top level alongside error/message/request.
        match payload.as_object_mut() {
            Some(map) => {
                let body_map = body.as_object_mut().expect("constructed as object");
                body_map.append(map);
            }
            None => {
                body["result"] = payload;
            }
        }
        (StatusCode::OK, Json(body)).into_response()
    }
}
