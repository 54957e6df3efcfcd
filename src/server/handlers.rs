//! HTTP request handlers

use crate::{
    Error,
    server::app::AppState,
    storage::AccountStore,
    types::{AccountErrorResponse, ErrorLogResponse, ErrorResponse, PingResponse, UiErrorRequest},
    utils::version,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// HTTP status for a failed request
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Json(_) => StatusCode::BAD_REQUEST,
        Error::Upstream(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &Error) -> (StatusCode, Json<ErrorResponse>) {
    (status_for(error), Json(ErrorResponse::from_error(error)))
}

/// Truncated, lossy preview of a request body for logs
fn body_preview(body: &[u8]) -> String {
    if body.len() > 1000 {
        format!(
            "{}... (truncated, total {} bytes)",
            String::from_utf8_lossy(&body[..1000]),
            body.len()
        )
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}

/// Ping endpoint for health checks
///
/// GET /ping
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    tracing::debug!(
        "Ping response: uptime={}s, version={}",
        uptime,
        version::get_version()
    );
    Json(PingResponse::new(uptime, version::get_version()))
}

/// Acknowledge an error reported by the banking widget
///
/// POST /handle_ui_error
///
/// Logs the reported error and ends the widget's banking session.
pub async fn handle_ui_error(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let request: UiErrorRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(
                "Failed to deserialize JSON request: {}\nBody preview: {}",
                e,
                body_preview(&body)
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_context(
                    format!("Invalid JSON: {}", e),
                    "json_deserialization",
                )),
            )
                .into_response();
        }
    };

    match state
        .ui_errors
        .handle_ui_error(request.error.as_deref(), &request.session_id_short)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(
                details = %crate::error::format_error_for_logging(&e),
                "Failed to handle UI error for session {}",
                request.session_id_short
            );
            error_response(&e).into_response()
        }
    }
}

/// Committed error message of a bank account
///
/// GET /accounts/{account}/error_message
pub async fn account_error_message(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<AccountErrorResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.error_message(&account) {
        Ok(error_message) => Ok(Json(AccountErrorResponse {
            account,
            error_message,
        })),
        Err(e) => {
            tracing::debug!("Account error message lookup failed: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Recently recorded error log entries
///
/// GET /error_log
pub async fn error_log(State(state): State<AppState>) -> Json<ErrorLogResponse> {
    Json(ErrorLogResponse {
        entries: state.error_log.entries(),
    })
}
