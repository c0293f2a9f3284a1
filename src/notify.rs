//! Toast notifications that survive a post/redirect/get cycle in a short-lived cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::cookie::{flash_cookie, read_cookie, removal_cookie, to_header_value, FLASH_COOKIE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(ToastKind::Success),
            "error" => Some(ToastKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// `success=Category+created&error=...`
pub fn encode(toasts: &[Toast]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for toast in toasts {
        serializer.append_pair(toast.kind.as_str(), &toast.message);
    }
    serializer.finish()
}

/// Unknown kinds are skipped
pub fn decode(value: &str) -> Vec<Toast> {
    url::form_urlencoded::parse(value.as_bytes())
        .filter_map(|(kind, message)| {
            ToastKind::parse(&kind).map(|kind| Toast {
                kind,
                message: message.into_owned(),
            })
        })
        .collect()
}

/// Toasts handed over from the previous response
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Vec<Toast>);

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let toasts = read_cookie(&parts.headers, FLASH_COOKIE)
            .map(|value| decode(&value))
            .unwrap_or_default();
        Ok(Flash(toasts))
    }
}

/// See-other redirect carrying `toasts` to the next page
pub fn redirect_with(to: &str, toasts: &[Toast]) -> Response {
    let mut response = Redirect::to(to).into_response();
    if !toasts.is_empty() {
        if let Some(value) = to_header_value(&flash_cookie(encode(toasts))) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Expire the flash cookie once its toasts have been rendered
pub fn consume(mut response: Response, flash: &Flash) -> Response {
    if !flash.is_empty() {
        if let Some(value) = to_header_value(&removal_cookie(FLASH_COOKIE)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
