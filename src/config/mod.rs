use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Placeholder secret shipped with the development preset. Rejected everywhere else.
pub const DEVELOPMENT_SECRET: &str = "development-only-session-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub security: SecurityConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_ttl_hours: u64,
    pub role_policy: RolePolicy,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub page_size: u32,
    pub cache_ttl_secs: u64,
}

/// Which sessions the guard lets through to `/dashboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePolicy {
    /// Only sessions whose role claim is `admin`.
    AdminOnly,
    /// Any session with a valid signature and expiry.
    AnyAuthenticated,
}

impl RolePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" | "admin_only" | "admin-only" => Some(RolePolicy::AdminOnly),
            "any" | "authenticated" | "any_authenticated" => Some(RolePolicy::AnyAuthenticated),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set outside development")]
    MissingSecret,
    #[error("invalid BACKEND_API_URL '{0}': {1}")]
    InvalidBackendUrl(String, url::ParseError),
    #[error("LIST_PAGE_SIZE must be greater than zero")]
    ZeroPageSize,
    #[error("invalid SESSION_TTL_HOURS {0} (expected 1 to {})", MAX_SESSION_TTL_HOURS)]
    SessionTtlOutOfRange(u64),
}

/// One year
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("DASHBOARD_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("DASHBOARD_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("DASHBOARD_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Backend overrides
        if let Ok(v) = env::var("BACKEND_API_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = v.parse().unwrap_or(self.security.session_ttl_hours);
        }
        if let Ok(v) = env::var("SESSION_ROLE_POLICY") {
            self.security.role_policy = RolePolicy::parse(&v).unwrap_or(self.security.role_policy);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        // List overrides
        if let Ok(v) = env::var("LIST_PAGE_SIZE") {
            self.list.page_size = v.parse().unwrap_or(self.list.page_size);
        }
        if let Ok(v) = env::var("LIST_CACHE_TTL_SECS") {
            self.list.cache_ttl_secs = v.parse().unwrap_or(self.list.cache_ttl_secs);
        }

        self
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.security.session_secret.trim();
        if secret.is_empty()
            || (self.environment != Environment::Development && secret == DEVELOPMENT_SECRET)
        {
            return Err(ConfigError::MissingSecret);
        }

        url::Url::parse(&self.backend.base_url)
            .map_err(|e| ConfigError::InvalidBackendUrl(self.backend.base_url.clone(), e))?;

        if self.list.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let ttl = self.security.session_ttl_hours;
        if ttl == 0 || ttl > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::SessionTtlOutOfRange(ttl));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                base_url: "http://localhost:5000/api/v1".to_string(),
                timeout_secs: 30,
            },
            security: SecurityConfig {
                session_secret: DEVELOPMENT_SECRET.to_string(),
                session_ttl_hours: 24 * 7, // 1 week
                role_policy: RolePolicy::AdminOnly,
                secure_cookies: false,
            },
            list: ListConfig {
                page_size: 10,
                cache_ttl_secs: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                base_url: "https://staging-api.example.com/api/v1".to_string(),
                timeout_secs: 15,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_ttl_hours: 24 * 7,
                role_policy: RolePolicy::AdminOnly,
                secure_cookies: true,
            },
            list: ListConfig {
                page_size: 10,
                cache_ttl_secs: 15,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: false,
            },
            backend: BackendConfig {
                base_url: "https://api.example.com/api/v1".to_string(),
                timeout_secs: 10,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_ttl_hours: 24 * 7,
                role_policy: RolePolicy::AdminOnly,
                secure_cookies: true,
            },
            list: ListConfig {
                page_size: 10,
                cache_ttl_secs: 30,
            },
        }
    }
}
