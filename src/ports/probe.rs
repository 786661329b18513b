//! Health Probe Port - Backend Availability Interface
//!
//! Defines the trait for probing a remote backend that may be cold-starting.
//! Two probes with distinct meanings: `check_health` confirms the process
//! answers at all, `check_data_readiness` confirms its data-serving path
//! (not just the liveness port) can satisfy a real query.

use async_trait::async_trait;
use thiserror::Error;

/// Why a probe did not succeed.
///
/// Every variant is a recoverable, expected condition: a sleeping backend
/// is the normal case this crate exists for. Callers fold these into phase
/// state; nothing here is surfaced to the user as a hard failure.
#[derive(Debug, Error)]
pub enum ProbeError {
  /// The backend did not answer before the probe deadline.
  #[error("backend did not answer before the probe timeout")]
  Timeout,

  /// Connection could not be established (refused, DNS, TLS, reset).
  #[error("backend unreachable: {0}")]
  Unreachable(String),

  /// The backend answered, but not with a 2xx.
  #[error("backend answered with HTTP {code}")]
  Status {
    /// HTTP status code returned.
    code: u16,
  },
}

/// Trait for backend availability probes.
///
/// Implementors talk to whatever liveness surface the backend exposes
/// (HTTP endpoints in production, scripted results in tests). Both probes
/// must be idempotent and safe to call repeatedly — the poller retries
/// them at a fixed interval indefinitely.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
  /// Lightweight liveness probe.
  ///
  /// Expected to resolve quickly when the backend process is running and
  /// to reject (timeout or connection error) when it is asleep.
  async fn check_health(&self) -> Result<(), ProbeError>;

  /// Minimal real data fetch.
  ///
  /// Distinguishes "process is up" from "process is up but its data layer
  /// is not yet warm" by exercising an actual (if trivial) query path.
  async fn check_data_readiness(&self) -> Result<(), ProbeError>;
}
