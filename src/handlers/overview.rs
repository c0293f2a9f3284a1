use axum::{extract::State, http::StatusCode, response::Response};

use crate::auth::Session;
use crate::notify::Flash;
use crate::state::AppState;
use crate::views::{self, overview};

/// GET /dashboard - stat cards and the monthly projects chart.
///
/// The two backend reads run concurrently and fail independently; a failed one renders its own
/// message in place.
pub async fn show(State(state): State<AppState>, session: Session, flash: Flash) -> Response {
    let (stats, monthly) = futures::join!(state.backend.overview(), state.backend.monthly_projects());

    let stats = stats.map_err(|e| {
        tracing::warn!("overview stats unavailable: {}", e);
        e.user_message("Failed to load statistics")
    });
    let monthly = monthly.map_err(|e| {
        tracing::warn!("monthly projects unavailable: {}", e);
        e.user_message("Failed to load chart data")
    });

    let body = overview::render(
        stats.as_ref().map_err(String::as_str),
        monthly.as_deref().map_err(String::as_str),
    );
    let html = views::layout("Overview", "/dashboard", &session, &flash.0, &body);
    views::render(StatusCode::OK, html, &flash)
}
