//! Configuration validation
//!
//! Runs the config's own checks plus warnings that only make sense at startup.

use anyhow::Result;
use meshlink_core::Config;

/// Validate configuration values, failing fast on anything that would break at runtime.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.public_base_url.is_none() {
        tracing::warn!(
            "PUBLIC_BASE_URL not set in production - download links will be built from the Host header"
        );
    }

    match config.cleanup_interval {
        None => tracing::warn!(
            "CLEANUP_INTERVAL_SECS=0 - expired downloads are only removed when the registry is accessed"
        ),
        Some(interval) if interval > config.download_ttl => tracing::warn!(
            cleanup_interval_secs = interval.as_secs(),
            download_ttl_secs = config.download_ttl.as_secs(),
            "Cleanup interval exceeds download TTL - expired files may linger"
        ),
        Some(_) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_passes() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_ttl_fails() {
        let config = Config {
            download_ttl: Duration::ZERO,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
