use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// PostgreSQL connection URL backing the document store
    pub database_url: String,

    /// Maximum payload size for uploads and JSON bodies (in bytes)
    /// Default: 10MB
    pub max_payload_size: usize,

    /// Maximum connections in the database pool
    pub max_db_connections: u32,

    /// Staging area for uploaded spreadsheets and their error reports
    pub upload_dir: String,

    /// Directory for rotated log files
    pub log_dir: String,

    /// Minutes a finished import job stays pollable before eviction
    pub job_retention_minutes: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Required:
    /// - DATABASE_URL: PostgreSQL connection string
    ///
    /// Optional:
    /// - MAX_PAYLOAD_SIZE (default: 10485760 = 10MB)
    /// - MAX_DB_CONNECTIONS (default: 5)
    /// - UPLOAD_DIR (default: "uploads")
    /// - LOG_DIR (default: "logs")
    /// - JOB_RETENTION_MINUTES (default: 1440 = 24h)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env file or environment".to_string())?;

        Ok(Config {
            database_url,
            max_payload_size: parse_or("MAX_PAYLOAD_SIZE", 10 * 1024 * 1024),
            max_db_connections: parse_or("MAX_DB_CONNECTIONS", 5),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            job_retention_minutes: parse_or("JOB_RETENTION_MINUTES", 24 * 60),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
