use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub catalog: CatalogConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Hard cap on rows fetched by any single declarative select.
    pub max_fetch: i64,
    /// Rows shown in the dashboard's recent-models panel.
    pub recent_models: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("CATALOG_MAX_FETCH") {
            self.catalog.max_fetch = v.parse().unwrap_or(self.catalog.max_fetch);
        }
        if let Ok(v) = env::var("CATALOG_RECENT_MODELS") {
            self.catalog.recent_models = v.parse().unwrap_or(self.catalog.recent_models);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            catalog: CatalogConfig {
                max_fetch: 1000,
                recent_models: 5,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                // Development fallback; real deployments set JWT_SECRET.
                jwt_secret: "automax-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            catalog: CatalogConfig {
                max_fetch: 500,
                recent_models: 5,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.automax.example".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            catalog: CatalogConfig {
                max_fetch: 500,
                recent_models: 5,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://automax.example".to_string()],
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.catalog.max_fetch, 1000);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_requires_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }
}
