//! Typed client for the external REST API.
//!
//! The backend is a black box: every call goes through [`envelope::read_envelope`] and comes back as
//! a typed `Result`. Write calls carry the session's bearer token when it has one.

mod envelope;
pub mod models;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::list::ListState;
use crate::resources::ResourceKind;
use crate::types::Mutation;

use envelope::read_envelope;
pub use models::{
    BackendUser, Category, LoginData, MonthlyProjects, MutationReceipt, NamedEntity, OverviewStats,
    Page, Pagination, Profile, Project, Reference, SignupRequest,
};

#[derive(Debug, Error)]
pub enum BackendError {
    /// Non-2xx status or a `success: false` envelope
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Body did not match the expected shape
    #[error("unexpected backend response: {0}")]
    Schema(String),
    /// Record id that cannot address a single resource (empty, dot segment, or carries `/ \\ ? #`)
    #[error("invalid record id {0:?}")]
    InvalidId(String),
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    /// Connection, TLS or timeout failure
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    /// Message safe to show in a notification
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Api { message, .. } if !message.is_empty() => message.clone(),
            BackendError::InvalidId(_) => "Record not found".to_string(),
            BackendError::Transport(e) if e.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::InvalidId(_) => Some(404),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `{collection}/{id}` with the id pushed as one encoded path segment
    fn record_url(&self, collection: &str, id: &str) -> Result<reqwest::Url, BackendError> {
        if !is_record_id(id) {
            return Err(BackendError::InvalidId(id.to_string()));
        }
        let mut url = reqwest::Url::parse(&self.url(collection))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidId(id.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, BackendError> {
        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let mut envelope = read_envelope(response).await?;
        let data: Value = envelope.data()?;

        // The user sits at data.user on current deployments and directly at data on older ones
        let user_value = data.get("user").cloned().unwrap_or_else(|| data.clone());
        let user: BackendUser = serde_json::from_value(user_value)
            .map_err(|e| BackendError::Schema(format!("login user: {}", e)))?;
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(envelope.token);

        Ok(LoginData { user, token })
    }

    /// POST /auth/signup
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), BackendError> {
        let response = self.http.post(self.url("auth/signup")).json(request).send().await?;
        read_envelope(response).await?;
        Ok(())
    }

    /// Read one page of a collection with the list's filters applied
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        state: &ListState,
        limit: u32,
    ) -> Result<Page<T>, BackendError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if kind.supports_filters() {
            query.push(("search", state.search.clone()));
            query.push(("category", state.category.clone().unwrap_or_default()));
        }
        query.push(("page", state.page.to_string()));
        query.push(("limit", limit.to_string()));

        tracing::debug!(resource = kind.slug(), page = state.page, "fetching page");
        let response = self.http.get(self.url(kind.page_path())).query(&query).send().await?;
        let mut envelope = read_envelope(response).await?;

        let items: Vec<T> = envelope.data()?;
        let pagination = Pagination::from_wire(envelope.pagination()?, state.page, limit);
        Ok(Page { items, pagination })
    }

    /// Unpaginated listing used to populate select options
    pub async fn fetch_all<T: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<T>, BackendError> {
        let response = self.http.get(self.url(kind.collection_path())).send().await?;
        read_envelope(response).await?.data()
    }

    /// POST /{resource}, PUT /{resource}/{id} or DELETE /{resource}/{id}
    pub async fn mutate(
        &self,
        kind: ResourceKind,
        mutation: Mutation,
        id: Option<&str>,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<MutationReceipt, BackendError> {
        let url = match id {
            Some(id) => self.record_url(kind.collection_path(), id)?,
            None => reqwest::Url::parse(&self.url(kind.collection_path()))?,
        };

        let mut request = self.http.request(mutation.method(), url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let envelope = read_envelope(request.send().await?).await?;
        Ok(MutationReceipt {
            message: envelope.message,
        })
    }

    /// GET /overview
    pub async fn overview(&self) -> Result<OverviewStats, BackendError> {
        let response = self.http.get(self.url("overview")).send().await?;
        read_envelope(response).await?.data()
    }

    /// GET /overview/projects/monthly
    pub async fn monthly_projects(&self) -> Result<Vec<MonthlyProjects>, BackendError> {
        let response = self.http.get(self.url("overview/projects/monthly")).send().await?;
        read_envelope(response).await?.data()
    }
}

fn is_record_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.chars().any(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_control())
}
