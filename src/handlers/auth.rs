use std::collections::HashMap;

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::cookie::{removal_cookie, session_cookie, to_header_value, SESSION_COOKIE};
use crate::auth::{self, AuthError, Session};
use crate::backend::SignupRequest;
use crate::forms::{self, FieldDescriptor, FieldKind, FormValues};
use crate::middleware::current_session;
use crate::notify::{self, Flash, Toast};
use crate::state::AppState;
use crate::views::{self, pages};

pub const LOGIN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("email", "Email", FieldKind::Email)
        .required()
        .placeholder("you@example.com"),
    FieldDescriptor::new("password", "Password", FieldKind::Password).required(),
];

pub const REGISTER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", "Full name", FieldKind::Text).required(),
    FieldDescriptor::new("email", "Email", FieldKind::Email)
        .required()
        .placeholder("you@example.com"),
    FieldDescriptor::new("password", "Password", FieldKind::Password)
        .required()
        .min_len(6),
];

/// GET /login
pub async fn login_form(State(state): State<AppState>, headers: HeaderMap, flash: Flash) -> Response {
    if current_session(&state, &headers).is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let html = pages::login(LOGIN_FIELDS, &FormValues::new(), None, &flash.0);
    views::render(StatusCode::OK, html, &flash)
}

/// POST /login
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let values = FormValues::from(form);
    let email = values.get("email").trim().to_string();
    let password = values.get("password").to_string();

    let security = &state.config.security;
    let session = match auth::authenticate(&state.backend, &email, &password, security.role_policy, security.session_ttl_hours).await {
        Ok(session) => session,
        Err(e) => return login_failed(&values, e),
    };

    let token = match state.keys.issue(&session) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to sign session: {}", e);
            return login_failed(&values, AuthError::Rejected("Unable to start a session".to_string()));
        }
    };

    tracing::info!(user = %session.email, "login succeeded");
    let mut response = notify::redirect_with("/dashboard", &[Toast::success("Login successful")]);
    if let Some(value) = to_header_value(&session_cookie(token, security.session_ttl_hours, security.secure_cookies)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

fn login_failed(values: &FormValues, error: AuthError) -> Response {
    let status = match error {
        AuthError::MissingCredentials => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::NotAdmin => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };
    tracing::debug!("login refused: {}", error);

    // Only the email is echoed back
    let kept = FormValues::new().with("email", values.get("email"));
    let html = pages::login(LOGIN_FIELDS, &kept, None, &[Toast::error(error.to_string())]);
    (status, Html(html)).into_response()
}

/// GET /register
pub async fn register_form(flash: Flash) -> Response {
    let html = pages::register(REGISTER_FIELDS, &FormValues::new(), None, &flash.0);
    views::render(StatusCode::OK, html, &flash)
}

/// POST /register
pub async fn register_submit(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let values = FormValues::from(form);

    if let Err(errors) = forms::validate(REGISTER_FIELDS, &values) {
        let html = pages::register(REGISTER_FIELDS, &values, Some(&errors), &[]);
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
    }

    let request = SignupRequest {
        full_name: values.get("name").trim().to_string(),
        email: values.get("email").trim().to_string(),
        password: values.get("password").to_string(),
    };

    match state.backend.signup(&request).await {
        Ok(()) => {
            tracing::info!(user = %request.email, "account created");
            notify::redirect_with("/login", &[Toast::success("Account created successfully!")])
        }
        Err(e) => {
            tracing::warn!("signup failed: {}", e);
            let toast = Toast::error(e.user_message("Registration failed"));
            let html = pages::register(REGISTER_FIELDS, &values, None, &[toast]);
            (StatusCode::BAD_REQUEST, Html(html)).into_response()
        }
    }
}

/// GET /logout
pub async fn logout_confirm(session: Session) -> Response {
    Html(pages::logout_confirm(&session)).into_response()
}

/// POST /logout
pub async fn logout(session: Session) -> Response {
    tracing::info!(user = %session.email, "logout");
    let mut response = Redirect::to("/login").into_response();
    if let Some(value) = to_header_value(&removal_cookie(SESSION_COOKIE)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
