use super::*;

fn error_body(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({"error": msg}))).into_response()
}

pub(super) fn bad_request(msg: &str) -> Response {
    error_body(StatusCode::BAD_REQUEST, msg)
}

pub(super) fn not_found(msg: &str) -> Response {
    error_body(StatusCode::NOT_FOUND, msg)
}

pub(super) fn conflict(msg: &str) -> Response {
    error_body(StatusCode::CONFLICT, msg)
}

pub(super) fn internal_error(msg: &str) -> Response {
    error_body(StatusCode::INTERNAL_SERVER_ERROR, msg)
}

/// Map a workflow error to its HTTP status. Only the detail message is
/// sent; the client adds the path and action itself.
pub(super) fn flow_error(err: FlowError) -> Response {
    match err {
        FlowError::ArtifactNotFound { message, .. } => not_found(&message),
        FlowError::NodeNotFound(path) => not_found(&format!("no such node {}", path)),
        FlowError::Command { message, .. } if message == NO_SUCH_NODE => not_found(&message),
        FlowError::Command { message, .. } => conflict(&message),
        FlowError::Validation(msg) | FlowError::Forbidden(msg) => bad_request(&msg),
        other => internal_error(&other.to_string()),
    }
}

pub(super) fn text(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
