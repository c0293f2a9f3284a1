#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::Response;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_dashboard::auth::cookie::{FLASH_COOKIE, SESSION_COOKIE};
use admin_dashboard::auth::{Role, Session};
use admin_dashboard::config::{AppConfig, RolePolicy};
use admin_dashboard::notify::{self, Toast};
use admin_dashboard::AppState;

/// Bearer token the mock backend hands out and expects back on writes
pub const BACKEND_TOKEN: &str = "backend-token";

/// Dashboard served in-process on a free port, talking to a wiremock backend
pub struct TestApp {
    pub base_url: String,
    pub backend: MockServer,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(RolePolicy::AdminOnly).await
    }

    pub async fn spawn_with(policy: RolePolicy) -> Result<Self> {
        let backend = MockServer::start().await;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;

        let mut config = AppConfig::development();
        config.server.port = port;
        config.server.enable_request_logging = false;
        config.backend.base_url = backend.uri();
        config.backend.timeout_secs = 5;
        config.security.role_policy = policy;
        config.list.cache_ttl_secs = 60;

        let state = AppState::new(config)?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let app = admin_dashboard::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Redirects are part of what the tests check
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
            state,
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `Cookie` header value for a freshly signed session
    pub fn session_cookie(&self, role: Role) -> String {
        let session = Session {
            sub: "u1".into(),
            name: "Ada Admin".into(),
            email: "ada@example.com".into(),
            role,
            access_token: Some(BACKEND_TOKEN.into()),
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = self.state.keys.issue(&session).expect("sign test session");
        format!("{}={}", SESSION_COOKIE, token)
    }

    pub fn admin_cookie(&self) -> String {
        self.session_cookie(Role::Admin)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)], cookie: Option<&str>) -> Result<Response> {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }
}

/// Value of a cookie set by `response`, if any
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| {
            let pair = v.split(';').next()?;
            let (n, value) = pair.split_once('=')?;
            (n == name).then(|| value.to_string())
        })
}

/// Toasts carried to the next page by a redirect
pub fn flash(response: &Response) -> Vec<Toast> {
    set_cookie(response, FLASH_COOKIE)
        .map(|value| notify::decode(&value))
        .unwrap_or_default()
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn category(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "createdAt": "2025-03-01T10:00:00.000Z" })
}

pub fn page_body(data: Vec<Value>, total: u64, page: u32, limit: u32) -> Value {
    json!({
        "success": true,
        "data": data,
        "pagination": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": total.div_ceil(limit as u64),
        }
    })
}

/// Unpaginated option lists for the project form selects
pub async fn mount_options(backend: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [category("c1", "Web"), category("c2", "Mobile")]
        })))
        .mount(backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "_id": "pr1", "name": "Studio" }]
        })))
        .mount(backend)
        .await;
}
