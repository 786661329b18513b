//! Core readiness domain types.
//!
//! A cold-starting backend moves through three observable stages as seen
//! from the client: the process itself is still asleep, the process is up
//! but its data services are still warming, and fully ready. These types
//! capture that progression plus the bookkeeping the UI layer renders
//! (spinner flag, attempt counters).

use serde::{Deserialize, Serialize};

/// Stage of the startup/readiness machine.
///
/// `Ready` is terminal for a machine instance. A persistent consumer that
/// needs to represent a later regression (the backend fell asleep again)
/// creates a fresh instance starting over at `AwaitingServer` instead of
/// rewinding this enum in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Health endpoint has not answered yet; the backend process is
    /// presumed asleep or still booting.
    AwaitingServer,
    /// Health endpoint answers, but the data-serving path has not
    /// confirmed yet.
    AwaitingData,
    /// Both probes succeeded; the application may proceed.
    Ready,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingServer => write!(f, "awaiting-server"),
            Self::AwaitingData => write!(f, "awaiting-data"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Point-in-time view of one readiness machine instance.
///
/// Invariants upheld by the machine that publishes these:
/// - `AwaitingData` or `Ready` implies the most recent health probe succeeded.
/// - `Ready` implies the most recent data probe succeeded.
/// - Counters increment once per probe invocation, successful ones included,
///   and are never reset within an instance's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
    /// Current stage of the machine.
    pub phase: Phase,
    /// True while a probe request is in flight. Display-only; drives the
    /// spinner, carries no correctness weight.
    pub is_checking: bool,
    /// Health probes issued so far by this instance.
    pub server_check_attempts: u32,
    /// Data-readiness probes issued so far by this instance.
    pub data_check_attempts: u32,
}

impl ReadinessSnapshot {
    /// Starting state for a fresh machine instance.
    pub const fn initial() -> Self {
        Self {
            phase: Phase::AwaitingServer,
            is_checking: false,
            server_check_attempts: 0,
            data_check_attempts: 0,
        }
    }

    /// Whether the gate has fully opened.
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }
}

impl Default for ReadinessSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
