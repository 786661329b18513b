//! Readiness Poller - Fixed-interval Check Loop
//!
//! Drives a `ReadinessGate` until it opens: one check cycle immediately,
//! then one per interval. No backoff and no attempt cap: the expected
//! failure cause is a cold-starting backend that will eventually come up,
//! so the loop retries at a fixed cadence until readiness or shutdown.
//!
//! Once the gate opens the timer stops for good, the success state is held
//! for a presentational delay, and `run` returns exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, info};

use crate::ports::HealthProbe;
use crate::usecases::readiness::ReadinessGate;

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
  /// The gate opened; the success hold has elapsed.
  Ready,
  /// Shutdown was signalled before the gate opened.
  Cancelled,
}

/// Fixed-interval polling loop around one gate instance.
pub struct ReadinessPoller<P: HealthProbe> {
  /// Gate whose cycles this loop schedules.
  gate: Arc<ReadinessGate<P>>,
  /// Interval between check cycles.
  poll_interval: Duration,
  /// Presentational hold between readiness and returning to the caller.
  ready_hold: Duration,
}

impl<P: HealthProbe> ReadinessPoller<P> {
  /// Create a poller over an existing gate.
  pub const fn new(
    gate: Arc<ReadinessGate<P>>,
    poll_interval: Duration,
    ready_hold: Duration,
  ) -> Self {
    Self {
      gate,
      poll_interval,
      ready_hold,
    }
  }

  /// Poll until the gate opens or shutdown is signalled.
  ///
  /// The first cycle runs immediately; later ones tick at the configured
  /// interval. Cycles are awaited, never raced, so the loop itself cannot
  /// overlap two probes. Shutdown wins at every await point: a probe that
  /// is still in flight when shutdown arrives is abandoned there, and its
  /// eventual resolution mutates nothing.
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> PollOutcome {
    let mut ticker = interval(self.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Readiness poller shutting down before gate opened");
          return PollOutcome::Cancelled;
        }
        _ = ticker.tick() => {
          tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
              info!("Readiness poller shutting down mid-cycle");
              return PollOutcome::Cancelled;
            }
            () = self.gate.run_check_cycle() => {}
          }
          if self.gate.snapshot().is_ready() {
            break;
          }
          debug!(
            server_attempts = self.gate.snapshot().server_check_attempts,
            data_attempts = self.gate.snapshot().data_check_attempts,
            "Gate still closed, next cycle scheduled"
          );
        }
      }
    }

    // Loop exited: the ticker is never awaited again, so no further
    // cycles get scheduled.
    info!(hold = ?self.ready_hold, "Gate open, holding success state");
    tokio::select! {
      biased;
      _ = shutdown_rx.recv() => PollOutcome::Cancelled,
      () = sleep(self.ready_hold) => PollOutcome::Ready,
    }
  }
}
