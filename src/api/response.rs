//! JSON response helpers.
//!
//! axum's `Json` sets `application/json` without a charset; the clients of
//! these backends expect `application/json; charset=utf-8` on every body,
//! success or error, so all handlers go through here.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

const SERIALIZE_FAILED: &str = r#"{"error":"Internal server error"}"#;

pub fn json_with_status<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    let content_type = [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))];

    match serde_json::to_vec(body) {
        Ok(bytes) => (status, content_type, bytes).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response body");
            (StatusCode::INTERNAL_SERVER_ERROR, content_type, SERIALIZE_FAILED).into_response()
        }
    }
}

/// 200 OK
pub fn ok<T: Serialize + ?Sized>(body: &T) -> Response {
    json_with_status(StatusCode::OK, body)
}

/// 201 Created
pub fn created<T: Serialize + ?Sized>(body: &T) -> Response {
    json_with_status(StatusCode::CREATED, body)
}

/// `{"message": "..."}` with 200.
pub fn message(text: impl Into<String>) -> Response {
    ok(&serde_json::json!({ "message": text.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_utf8_json_content_type() {
        let res = created(&serde_json::json!({"id": 1}));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), JSON_UTF8);
    }
}
