//! Configuration module
//!
//! This module provides the service configuration, loaded from the environment
//! (with `.env` support) and validated once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const SERVER_PORT: u16 = 3000;
const DOWNLOAD_TTL_SECS: u64 = 600;
const MAX_DOWNLOAD_TTL_SECS: u64 = 86_400;
const CLEANUP_INTERVAL_SECS: u64 = 60;
const MAX_FILE_SIZE_MB: usize = 50;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub scratch_dir: PathBuf,
    pub download_ttl: Duration,
    /// Interval between background expiration sweeps. `None` disables the sweep.
    pub cleanup_interval: Option<Duration>,
    pub max_file_size_bytes: usize,
    pub auto_reorient: bool,
    /// Base used for download URLs; when unset the request's Host header is used.
    pub public_base_url: Option<String>,
    pub purge_scratch_on_start: bool,
    pub http_concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            scratch_dir: PathBuf::from("uploads"),
            download_ttl: Duration::from_secs(DOWNLOAD_TTL_SECS),
            cleanup_interval: Some(Duration::from_secs(CLEANUP_INTERVAL_SECS)),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            auto_reorient: true,
            public_base_url: None,
            purge_scratch_on_start: true,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

/// Parse an optional setting, falling back to `default` only when it is unset.
fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &str,
    default: T,
    expected: &str,
) -> Result<T, anyhow::Error> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be {} (got '{}')", name, expected, raw)),
    }
}

fn parse_bool(value: Option<String>, name: &str, default: bool) -> Result<bool, anyhow::Error> {
    parse_or(
        value.map(|v| v.trim().to_lowercase()),
        name,
        default,
        "true or false",
    )
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build and validate a configuration from a variable lookup.
    ///
    /// Unset variables take their defaults; set but malformed ones are errors.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = parse_or(get("PORT"), "PORT", SERVER_PORT, "a valid port number")?;

        let download_ttl_secs: u64 = parse_or(
            get("DOWNLOAD_TTL_SECS"),
            "DOWNLOAD_TTL_SECS",
            DOWNLOAD_TTL_SECS,
            "a whole number of seconds",
        )?;

        let cleanup_interval_secs: u64 = parse_or(
            get("CLEANUP_INTERVAL_SECS"),
            "CLEANUP_INTERVAL_SECS",
            CLEANUP_INTERVAL_SECS,
            "a whole number of seconds",
        )?;

        let max_file_size_mb: usize = parse_or(
            get("MAX_FILE_SIZE_MB"),
            "MAX_FILE_SIZE_MB",
            MAX_FILE_SIZE_MB,
            "a whole number of megabytes",
        )?;
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", max_file_size_mb)
            })?;

        let http_concurrency_limit: usize = parse_or(
            get("HTTP_CONCURRENCY_LIMIT"),
            "HTTP_CONCURRENCY_LIMIT",
            HTTP_CONCURRENCY_LIMIT,
            "a whole number",
        )?;

        let config = Config {
            server_port,
            environment,
            cors_origins,
            scratch_dir: PathBuf::from(get("SCRATCH_DIR").unwrap_or_else(|| "uploads".to_string())),
            download_ttl: Duration::from_secs(download_ttl_secs),
            cleanup_interval: (cleanup_interval_secs > 0)
                .then(|| Duration::from_secs(cleanup_interval_secs)),
            max_file_size_bytes,
            auto_reorient: parse_bool(get("AUTO_REORIENT"), "AUTO_REORIENT", true)?,
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            purge_scratch_on_start: parse_bool(
                get("PURGE_SCRATCH_ON_START"),
                "PURGE_SCRATCH_ON_START",
                true,
            )?,
            http_concurrency_limit,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let ttl = self.download_ttl.as_secs();
        if ttl == 0 || ttl > MAX_DOWNLOAD_TTL_SECS {
            return Err(anyhow::anyhow!(
                "DOWNLOAD_TTL_SECS must be between 1 and {}",
                MAX_DOWNLOAD_TTL_SECS
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        if self.scratch_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("SCRATCH_DIR must not be empty"));
        }

        if let Some(base) = &self.public_base_url {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "PUBLIC_BASE_URL must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }
}

/// Whether an environment name denotes production.
pub fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
