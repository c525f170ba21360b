use anyhow::Result;
use std::env;

const PRODUCTION_ORIGIN: &str = "https://days-since.theclusterflux.com";
const DEVELOPMENT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub cors_origin: Option<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_seconds: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./days-since.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|s| !s.trim().is_empty()),
            rate_limit_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            rate_limit_window_seconds: env::var("RATE_LIMIT_WINDOW_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origin allowed by CORS; an explicit `CORS_ORIGIN` wins over the environment default.
    pub fn allowed_origin(&self) -> String {
        match &self.cors_origin {
            Some(origin) => origin.clone(),
            None if self.is_production() => PRODUCTION_ORIGIN.to_string(),
            None => DEVELOPMENT_ORIGIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, cors_origin: Option<&str>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: environment.to_string(),
            cors_origin: cors_origin.map(str::to_string),
            rate_limit_max_requests: 100,
            rate_limit_window_seconds: 900,
        }
    }

    #[test]
    fn test_allowed_origin_defaults_by_environment() {
        assert_eq!(
            config("production", None).allowed_origin(),
            "https://days-since.theclusterflux.com"
        );
        assert_eq!(
            config("development", None).allowed_origin(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_allowed_origin_override() {
        let config = config("production", Some("https://example.org"));
        assert_eq!(config.allowed_origin(), "https://example.org");
    }

    #[test]
    fn test_server_address() {
        assert_eq!(config("development", None).server_address(), "127.0.0.1:8080");
    }
}
