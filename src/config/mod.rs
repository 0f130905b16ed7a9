use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the dashboard API; route paths are joined onto it
    pub base_url: String,
    /// Mount point of the identity service on the same host
    pub auth_base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    /// Limit used when a dialog needs "everything" in one page
    pub picker_limit: u32,
}

pub const PRODUCTION_API_URL: &str = "https://api.mystrokeapi.uk/";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:3000/";
pub const DEFAULT_SESSION_COOKIE: &str = "better-auth.session_token";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("development") | Ok("dev") => Environment::Development,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Production,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("REVOICE_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("REVOICE_AUTH_BASE_PATH") {
            self.api.auth_base_path = v;
        }
        if let Ok(v) = env::var("REVOICE_SESSION_COOKIE") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("REVOICE_PAGE_SIZE") {
            self.pagination.default_page_size = v
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .unwrap_or(self.pagination.default_page_size);
        }
        if let Ok(v) = env::var("REVOICE_PICKER_LIMIT") {
            self.pagination.picker_limit = v
                .parse()
                .ok()
                .filter(|limit| *limit > 0)
                .unwrap_or(self.pagination.picker_limit);
        }

        self
    }

    fn base(environment: Environment, base_url: &str) -> Self {
        Self {
            environment,
            api: ApiConfig {
                base_url: base_url.to_string(),
                auth_base_path: "/auth/api".to_string(),
            },
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 20,
                picker_limit: 100,
            },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development, DEVELOPMENT_API_URL)
    }

    fn staging() -> Self {
        // No separate staging host exists; staging builds talk to production
        Self::base(Environment::Staging, PRODUCTION_API_URL)
    }

    fn production() -> Self {
        Self::base(Environment::Production, PRODUCTION_API_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_base_path: "/auth/api".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            picker_limit: 100,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
