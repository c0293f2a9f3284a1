use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::auth::SessionKeys;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::list::{ListContext, QueryCache};

/// Shared application state, built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub cache: Arc<QueryCache>,
    pub keys: SessionKeys,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let backend = BackendClient::new(&config.backend).context("failed to build backend client")?;
        let keys = SessionKeys::new(&config.security.session_secret).context("invalid session secret")?;
        let cache = Arc::new(QueryCache::new(Duration::from_secs(config.list.cache_ttl_secs)));

        Ok(Self {
            config: Arc::new(config),
            backend,
            cache,
            keys,
        })
    }

    pub fn list_context(&self) -> ListContext {
        ListContext::new(self.backend.clone(), self.cache.clone(), self.config.list.page_size)
    }
}
