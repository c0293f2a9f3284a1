use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};

use crate::config::MAX_SESSION_TTL_HOURS;

pub const SESSION_COOKIE: &str = "dashboard_session";
pub const FLASH_COOKIE: &str = "dashboard_flash";

/// HttpOnly cookie carrying the signed session token
pub fn session_cookie(token: String, ttl_hours: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(ttl_hours.min(MAX_SESSION_TTL_HOURS) as i64))
        .build()
}

/// Short-lived cookie carrying notifications across a redirect
pub fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(1))
        .build()
}

/// Cookie that instructs the browser to drop `name`
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .build()
}

/// Find a cookie value across all `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

pub fn to_header_value(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("cookie '{}' is not a valid header value: {}", cookie.name(), e);
            None
        }
    }
}
