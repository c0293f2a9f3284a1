use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::cookie::{read_cookie, removal_cookie, to_header_value, SESSION_COOKIE};
use crate::auth::Session;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

/// Gate for everything under `/dashboard`: verifies the session cookie and the configured role
/// policy, then attaches the [`Session`] to the request. Any failure is a redirect to the login page.
pub async fn session_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    let Some(token) = read_cookie(request.headers(), SESSION_COOKIE) else {
        tracing::debug!(%path, "no session cookie, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let session = match state.keys.verify(&token) {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(%path, "rejecting session: {}", e);
            return redirect_clearing_session();
        }
    };

    if !session.permits(state.config.security.role_policy) {
        tracing::debug!(%path, user = %session.email, "role not permitted, redirecting to login");
        return redirect_clearing_session();
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Session from the cookie, if the guard would let it through
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    read_cookie(headers, SESSION_COOKIE)
        .and_then(|token| state.keys.verify(&token).ok())
        .filter(|session| session.permits(state.config.security.role_policy))
}

fn redirect_clearing_session() -> Response {
    let mut response = Redirect::to(LOGIN_PATH).into_response();
    if let Some(value) = to_header_value(&removal_cookie(SESSION_COOKIE)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Handlers behind the guard take the verified session as an argument
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
