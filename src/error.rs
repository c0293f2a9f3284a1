// HTTP-facing error for dashboard pages
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::backend::BackendError;
use crate::views::pages;

/// Error a handler can return; rendered as an HTML error page
#[derive(Debug)]
pub enum DashboardError {
    // 404 Not Found
    NotFound(String),

    // 502 Bad Gateway (backend answered with an error or garbage)
    BadGateway(String),

    // 503 Service Unavailable (backend unreachable or too slow)
    ServiceUnavailable(String),
}

impl DashboardError {
    pub fn status_code(&self) -> u16 {
        match self {
            DashboardError::NotFound(_) => 404,
            DashboardError::BadGateway(_) => 502,
            DashboardError::ServiceUnavailable(_) => 503,
        }
    }

    /// Client-safe message
    pub fn message(&self) -> &str {
        match self {
            DashboardError::NotFound(msg) => msg,
            DashboardError::BadGateway(msg) => msg,
            DashboardError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::NotFound(_) => "NOT_FOUND",
            DashboardError::BadGateway(_) => "BAD_GATEWAY",
            DashboardError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl DashboardError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DashboardError::NotFound(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        DashboardError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        DashboardError::ServiceUnavailable(message.into())
    }
}

impl From<BackendError> for DashboardError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Api { status: 404, message } => DashboardError::not_found(message),
            BackendError::InvalidId(id) => {
                tracing::warn!("rejected record id {:?}", id);
                DashboardError::not_found("Record not found")
            }
            BackendError::Api { message, .. } => DashboardError::bad_gateway(message),
            BackendError::Url(e) => {
                tracing::error!("backend url invalid: {}", e);
                DashboardError::bad_gateway("The server returned an unexpected response")
            }
            BackendError::Schema(msg) => {
                // Log the real error but return generic message
                tracing::error!("backend schema mismatch: {}", msg);
                DashboardError::bad_gateway("The server returned an unexpected response")
            }
            BackendError::Transport(e) => {
                tracing::warn!("backend unreachable: {}", e);
                DashboardError::service_unavailable("The server is not reachable right now")
            }
        }
    }
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.error_code(), self.message())
    }
}

impl std::error::Error for DashboardError {}

impl IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let html = match self {
            DashboardError::NotFound(_) => pages::not_found(),
            ref other => pages::error(status.as_u16(), other.message()),
        };
        (status, Html(html)).into_response()
    }
}
