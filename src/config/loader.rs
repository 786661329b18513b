//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `wakegate.toml`, validating all parameters, and
//! providing clear error messages for misconfiguration. A missing file is
//! not an error: the built-in defaults describe a local backend.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::GateConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the wakegate.toml file
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<GateConfig> {
  let path = Path::new(path);

  let config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?
  } else {
    info!(path = %path.display(), "No config file found, using defaults");
    GateConfig::default()
  };

  validate_config(&config)?;

  info!(
    backend = %config.api.base_url,
    poll_interval_ms = config.timing.poll_interval_ms,
    "Configuration loaded"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Well-formed backend URL and endpoint paths
/// - Positive timeouts and poll interval
/// - Probe timeouts that fit inside the poll interval
fn validate_config(config: &GateConfig) -> Result<()> {
  // API validation
  anyhow::ensure!(
    config.api.base_url.starts_with("http://") || config.api.base_url.starts_with("https://"),
    "api.base_url must start with http:// or https://, got {:?}",
    config.api.base_url
  );
  anyhow::ensure!(
    !config.api.base_url.ends_with('/'),
    "api.base_url must not end with a slash, got {:?}",
    config.api.base_url
  );
  anyhow::ensure!(
    config.api.health_path.starts_with('/'),
    "api.health_path must start with '/', got {:?}",
    config.api.health_path
  );
  anyhow::ensure!(
    config.api.data_path.starts_with('/'),
    "api.data_path must start with '/', got {:?}",
    config.api.data_path
  );
  anyhow::ensure!(
    config.api.timeout_ms > 0,
    "api.timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.api.health_timeout_ms > 0,
    "api.health_timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.api.health_timeout_ms <= config.api.timeout_ms,
    "api.health_timeout_ms ({}) must not exceed api.timeout_ms ({})",
    config.api.health_timeout_ms,
    config.api.timeout_ms
  );

  // Timing validation
  anyhow::ensure!(
    config.timing.poll_interval_ms > 0,
    "timing.poll_interval_ms must be positive"
  );
  anyhow::ensure!(
    config.timing.poll_interval_ms >= config.api.health_timeout_ms,
    "timing.poll_interval_ms ({}) must be at least api.health_timeout_ms ({})",
    config.timing.poll_interval_ms,
    config.api.health_timeout_ms
  );

  Ok(())
}
