use std::env;

use crate::constants::DEFAULT_MAX_SUBMISSIONS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_busy_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Row cap installed on every form table
    pub max_submissions: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_host = var("SERVER_HOST", "0.0.0.0");
        let server_port = var("SERVER_PORT", "8080")
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url = var("DATABASE_URL", "sqlite://data/club_forms.db");

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .map_err(|_| "Invalid DATABASE_MAX_CONNECTIONS")?;

        let database_busy_timeout_secs = var("DATABASE_BUSY_TIMEOUT_SECS", "5")
            .parse()
            .map_err(|_| "Invalid DATABASE_BUSY_TIMEOUT_SECS")?;

        let allowed_origins = var("ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = var("ENVIRONMENT", "development");

        let max_submissions: u32 = var("MAX_SUBMISSIONS", &DEFAULT_MAX_SUBMISSIONS.to_string())
            .parse()
            .map_err(|_| "Invalid MAX_SUBMISSIONS")?;
        if max_submissions == 0 {
            return Err("MAX_SUBMISSIONS must be at least 1".to_string());
        }

        Ok(Config {
            server_host,
            server_port,
            database_url,
            database_max_connections,
            database_busy_timeout_secs,
            allowed_origins,
            environment,
            max_submissions,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
