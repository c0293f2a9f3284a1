pub mod auth;
pub mod overview;
pub mod resources;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde_json::json;

use crate::middleware::{current_session, LOGIN_PATH};
use crate::state::AppState;
use crate::views::pages;

/// GET /
pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /health - process liveness, no backend call
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "timestamp": chrono::Utc::now(),
        }
    }))
}

/// Unmatched paths. Unknown paths under `/dashboard` get the guard's login redirect first.
pub async fn not_found(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();
    if path == "/dashboard" || path.starts_with("/dashboard/") {
        if current_session(&state, &headers).is_none() {
            return Redirect::to(LOGIN_PATH).into_response();
        }
    }
    (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
}
