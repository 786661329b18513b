//! Configuration Module - TOML-based Gate Configuration
//!
//! Loads and validates configuration from `wakegate.toml`. Every timing
//! constant the gate uses (poll interval, presentational delays) is
//! externalized here - nothing is hardcoded in the usecases layer.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Top-level gate configuration.
///
/// Loaded from `wakegate.toml` at startup. All fields carry defaults, so a
/// missing file yields a fully usable configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GateConfig {
  /// Application identity and logging.
  pub app: AppConfig,
  /// Backend endpoints and HTTP timeouts.
  pub api: ApiConfig,
  /// Polling interval and presentational delays.
  pub timing: TimingConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Human-readable application name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      name: "wakegate".to_string(),
      log_level: default_log_level(),
    }
  }
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Backend base URL, no trailing slash.
  pub base_url: String,
  /// Path of the lightweight health endpoint.
  pub health_path: String,
  /// Path of a trivial real data endpoint (data-readiness probe).
  pub data_path: String,
  /// General request timeout (milliseconds). Data probes use this.
  pub timeout_ms: u64,
  /// Health probe timeout (milliseconds). Health probes are lighter-weight
  /// and should fail faster than ordinary API calls.
  pub health_timeout_ms: u64,
}

impl ApiConfig {
  /// General request timeout as a `Duration`.
  pub const fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }

  /// Health probe timeout as a `Duration`.
  pub const fn health_timeout(&self) -> Duration {
    Duration::from_millis(self.health_timeout_ms)
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8000".to_string(),
      health_path: "/health".to_string(),
      data_path: "/api/departments".to_string(),
      timeout_ms: 10_000,
      health_timeout_ms: 4_000,
    }
  }
}

/// Polling and presentation timing configuration.
///
/// The delays exist so phase changes are visible to a human rather than
/// flashing by: the intermediate "server is up, loading data" stage and
/// the "checking..." indicator each get a guaranteed minimum on screen.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
  /// Interval between check cycles (milliseconds).
  pub poll_interval_ms: u64,
  /// Pause between a successful health probe and the follow-up data probe
  /// within the same cycle (milliseconds).
  pub probe_gap_ms: u64,
  /// How long the "checking" indicator stays lit after a failed probe
  /// (milliseconds).
  pub checking_flash_ms: u64,
  /// How long the startup splash holds its success state (milliseconds).
  pub splash_ready_hold_ms: u64,
  /// Splash fade-out duration after the success hold (milliseconds).
  pub splash_fade_ms: u64,
  /// How long the recheck dialog displays success before closing
  /// (milliseconds).
  pub modal_ready_hold_ms: u64,
}

impl TimingConfig {
  /// Interval between check cycles.
  pub const fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }

  /// Pause between health success and the data probe.
  pub const fn probe_gap(&self) -> Duration {
    Duration::from_millis(self.probe_gap_ms)
  }

  /// Minimum visible duration of the checking indicator.
  pub const fn checking_flash(&self) -> Duration {
    Duration::from_millis(self.checking_flash_ms)
  }

  /// Total splash hold after readiness (success display + fade).
  pub const fn splash_ready_hold(&self) -> Duration {
    Duration::from_millis(self.splash_ready_hold_ms + self.splash_fade_ms)
  }

  /// Dialog hold after readiness.
  pub const fn modal_ready_hold(&self) -> Duration {
    Duration::from_millis(self.modal_ready_hold_ms)
  }
}

impl Default for TimingConfig {
  fn default() -> Self {
    Self {
      poll_interval_ms: 10_000,
      probe_gap_ms: 1_000,
      checking_flash_ms: 1_500,
      splash_ready_hold_ms: 1_500,
      splash_fade_ms: 1_500,
      modal_ready_hold_ms: 3_000,
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}
