use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub main_database: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_hours: u64,
    pub oauth_state_ttl_minutes: u64,
}

/// Google OAuth client settings. Endpoints are configurable so a local stub can stand in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub google_client_id: String,
    #[serde(skip_serializing)]
    pub google_client_secret: String,
    pub google_redirect_url: String,
    pub client_redirect_url: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
}

impl OAuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.google_client_id.is_empty()
            && !self.google_client_secret.is_empty()
            && !self.google_redirect_url.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: String,
    pub bucket: String,
}

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
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAIN_NAME") {
            if !v.trim().is_empty() {
                self.database.main_database = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_DEFAULT_PAGE_LIMIT") {
            self.api.default_page_limit = v.parse().unwrap_or(self.api.default_page_limit);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_LIMIT") {
            self.api.max_page_limit = v.parse().unwrap_or(self.api.max_page_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_OAUTH_STATE_TTL_MINUTES") {
            self.security.oauth_state_ttl_minutes = v.parse().unwrap_or(self.security.oauth_state_ttl_minutes);
        }

        // OAuth overrides
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.oauth.google_client_id = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.oauth.google_client_secret = v;
        }
        if let Ok(v) = env::var("GOOGLE_REDIRECT_URL") {
            self.oauth.google_redirect_url = v;
        }
        if let Ok(v) = env::var("CLIENT_REDIRECT_URL") {
            self.oauth.client_redirect_url = v;
        }
        if let Ok(v) = env::var("GOOGLE_AUTH_URL") {
            self.oauth.google_auth_url = v;
        }
        if let Ok(v) = env::var("GOOGLE_TOKEN_URL") {
            self.oauth.google_token_url = v;
        }
        if let Ok(v) = env::var("GOOGLE_USERINFO_URL") {
            self.oauth.google_userinfo_url = v;
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_ROOT") {
            self.storage.root = v;
        }
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.storage.bucket = v;
        }

        self
    }

    fn google_defaults() -> OAuthConfig {
        OAuthConfig {
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_redirect_url: String::new(),
            client_redirect_url: "http://localhost:5173/auth/callback".to_string(),
            google_auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            google_token_url: "https://oauth2.googleapis.com/token".to_string(),
            google_userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                main_database: "office_main".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 20 * 1024 * 1024, // 20MB
                default_page_limit: 20,
                max_page_limit: 1000,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "office-api-development-secret".to_string(),
                jwt_issuer: "office-api".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                oauth_state_ttl_minutes: 10,
            },
            oauth: Self::google_defaults(),
            storage: StorageConfig {
                root: "./data/objects".to_string(),
                bucket: "images".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                main_database: "office_main".to_string(),
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                default_page_limit: 20,
                max_page_limit: 500,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_issuer: "office-api".to_string(),
                jwt_expiry_hours: 24 * 7,
                oauth_state_ttl_minutes: 10,
            },
            oauth: Self::google_defaults(),
            storage: StorageConfig {
                root: "/var/lib/office-api/objects".to_string(),
                bucket: "images".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                main_database: "office_main".to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                default_page_limit: 20,
                max_page_limit: 100,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_issuer: "office-api".to_string(),
                jwt_expiry_hours: 24 * 7,
                oauth_state_ttl_minutes: 5,
            },
            oauth: Self::google_defaults(),
            storage: StorageConfig {
                root: "/var/lib/office-api/objects".to_string(),
                bucket: "images".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.main_database, "office_main");
        assert_eq!(config.api.default_page_limit, 20);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.storage.bucket, "images");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty(), "production secret must come from env");
        assert_eq!(config.api.max_page_limit, 100);
        assert_eq!(config.security.jwt_expiry_hours, 168);
    }

    #[test]
    fn oauth_requires_client_credentials() {
        let mut oauth = AppConfig::google_defaults();
        assert!(!oauth.is_configured());

        oauth.google_client_id = "client".to_string();
        oauth.google_client_secret = "secret".to_string();
        oauth.google_redirect_url = "http://localhost:3000/auth/google/callback".to_string();
        assert!(oauth.is_configured());
    }
}
