use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;

/// Recursively drop object keys whose value is the empty string. Other
/// falsy values (`0`, `false`, `null`) are kept.
pub fn remove_blanks(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
            map.values_mut().for_each(remove_blanks);
        }
        Value::Array(items) => items.iter_mut().for_each(remove_blanks),
        _ => {}
    }
}

/// Strips blank fields from a JSON request body so that fields left empty
/// in a form do not overwrite stored data. Bodies that are not valid JSON
/// are forwarded untouched for the handler to reject.
pub async fn remove_blank_fields(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, state.config.api.max_request_size_bytes)
        .await
        .map_err(|e| {
            let source = e.into_inner();
            if source.is::<LengthLimitError>() {
                ApiError::payload_too_large(format!(
                    "Request body exceeds {} bytes",
                    state.config.api.max_request_size_bytes
                ))
            } else {
                ApiError::bad_request(format!("Failed to read request body: {}", source))
            }
        })?;

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut json) => {
            remove_blanks(&mut json);
            parts.headers.remove(CONTENT_LENGTH);
            match serde_json::to_vec(&json) {
                Ok(sanitized) => Body::from(sanitized),
                Err(e) => {
                    tracing::error!("Failed to re-encode sanitized body: {}", e);
                    return Err(ApiError::internal_server_error("Failed to process request body"));
                }
            }
        }
        Err(_) => Body::from(bytes),
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}
