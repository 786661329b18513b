//! Readiness Gate - Cold-start Phase State Machine
//!
//! Tracks whether the backend is awake and whether its data services are
//! ready, publishing every change through a `tokio::sync::watch` channel.
//! Consumers (splash screen, recheck dialog, tests) observe the snapshot;
//! nothing here renders anything.
//!
//! One instance = one gating episode. `Ready` is terminal; a consumer that
//! wants to gate again later constructs a fresh instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::domain::{Phase, ReadinessSnapshot};
use crate::ports::HealthProbe;

/// Phase state machine for one cold-start gating episode.
///
/// Probe outcomes drive the transitions:
/// - `AwaitingServer` --health ok--> `AwaitingData` (same cycle continues
///   into the data probe after a short gap so the intermediate phase is
///   visible)
/// - `AwaitingData` --data ok--> `Ready`
/// - any probe failure leaves the phase where it is; the attempt counter
///   still increments
pub struct ReadinessGate<P: HealthProbe> {
  /// Probe collaborator shared with other gate instances.
  probe: Arc<P>,
  /// Pause between health success and the data probe within one cycle.
  probe_gap: Duration,
  /// Minimum visible duration of the checking indicator after a failure.
  checking_flash: Duration,
  /// Published state; `snapshot()` and `subscribe()` read from here.
  state_tx: watch::Sender<ReadinessSnapshot>,
  /// In-flight guard: at most one probe outstanding per instance.
  in_flight: AtomicBool,
}

impl<P: HealthProbe> ReadinessGate<P> {
  /// Create a gate at `AwaitingServer` with zeroed counters.
  pub fn new(probe: Arc<P>, probe_gap: Duration, checking_flash: Duration) -> Self {
    let (state_tx, _state_rx) = watch::channel(ReadinessSnapshot::initial());
    Self {
      probe,
      probe_gap,
      checking_flash,
      state_tx,
      in_flight: AtomicBool::new(false),
    }
  }

  /// Current state, cloned out of the watch channel.
  pub fn snapshot(&self) -> ReadinessSnapshot {
    self.state_tx.borrow().clone()
  }

  /// Subscribe to state changes.
  pub fn subscribe(&self) -> watch::Receiver<ReadinessSnapshot> {
    self.state_tx.subscribe()
  }

  /// Run one check cycle appropriate to the current phase.
  ///
  /// - `AwaitingServer`: health probe; on success advance to
  ///   `AwaitingData`, pause, then run the data probe in the same cycle.
  /// - `AwaitingData`: data probe directly (health is already known good).
  /// - `Ready`: no-op.
  ///
  /// A cycle entered while another probe is still outstanding returns
  /// immediately without issuing a redundant request. Callers observe
  /// results through the watch channel; there is no return value.
  pub async fn run_check_cycle(&self) {
    if self.snapshot().is_ready() {
      return;
    }
    if self.in_flight.swap(true, Ordering::AcqRel) {
      debug!("Probe already in flight, skipping cycle");
      return;
    }
    // Released on drop, so a cycle cancelled at an await point (poller
    // shutdown, aborted task) cannot wedge the instance.
    let _guard = CycleGuard {
      in_flight: &self.in_flight,
      state_tx: &self.state_tx,
    };

    match self.snapshot().phase {
      Phase::AwaitingServer => self.run_health_probe().await,
      Phase::AwaitingData => self.run_data_probe().await,
      Phase::Ready => {}
    }
  }

  /// Health step of a cycle; falls through into the data step on success.
  async fn run_health_probe(&self) {
    self.state_tx.send_modify(|s| {
      s.is_checking = true;
      s.server_check_attempts += 1;
    });

    match self.probe.check_health().await {
      Ok(()) => {
        let attempts = self.snapshot().server_check_attempts;
        info!(attempts, "Backend is awake, probing data services");
        self.state_tx.send_modify(|s| s.phase = Phase::AwaitingData);

        // Let the intermediate phase render before the next request.
        sleep(self.probe_gap).await;
        self.run_data_probe().await;
      }
      Err(e) => {
        debug!(error = %e, "Health probe failed, backend still asleep");
        self.settle_after_failure().await;
      }
    }
  }

  /// Data-readiness step of a cycle.
  async fn run_data_probe(&self) {
    self.state_tx.send_modify(|s| {
      s.is_checking = true;
      s.data_check_attempts += 1;
    });

    match self.probe.check_data_readiness().await {
      Ok(()) => {
        let snap = self.snapshot();
        info!(
          server_attempts = snap.server_check_attempts,
          data_attempts = snap.data_check_attempts,
          "Data services ready, gate open"
        );
        self.state_tx.send_modify(|s| {
          s.phase = Phase::Ready;
          s.is_checking = false;
        });
      }
      Err(e) => {
        debug!(error = %e, "Data probe failed, data services not warm yet");
        self.settle_after_failure().await;
      }
    }
  }

  /// Keep the checking indicator lit briefly so it reads as activity
  /// rather than an instantaneous flicker, then clear it.
  async fn settle_after_failure(&self) {
    sleep(self.checking_flash).await;
    self.state_tx.send_modify(|s| s.is_checking = false);
  }
}

/// Scope guard for one check cycle: releases the in-flight slot and turns
/// the checking indicator off however the cycle ends, completion and
/// cancellation alike.
struct CycleGuard<'a> {
  in_flight: &'a AtomicBool,
  state_tx: &'a watch::Sender<ReadinessSnapshot>,
}

impl Drop for CycleGuard<'_> {
  fn drop(&mut self) {
    self.state_tx.send_if_modified(|s| {
      let lit = s.is_checking;
      s.is_checking = false;
      lit
    });
    self.in_flight.store(false, Ordering::Release);
  }
}

#[cfg(test)]
mod tests {
  use std::collections::VecDeque;
  use std::sync::Mutex;
  use std::sync::atomic::AtomicU32;

  use async_trait::async_trait;
  use tokio::sync::Notify;

  use super::*;
  use crate::ports::ProbeError;

  /// Probe fake with scripted per-call outcomes. `true` = success.
  struct ScriptedProbe {
    health: Mutex<VecDeque<bool>>,
    data: Mutex<VecDeque<bool>>,
    health_calls: AtomicU32,
    data_calls: AtomicU32,
  }

  impl ScriptedProbe {
    fn new(health: &[bool], data: &[bool]) -> Arc<Self> {
      Arc::new(Self {
        health: Mutex::new(health.iter().copied().collect()),
        data: Mutex::new(data.iter().copied().collect()),
        health_calls: AtomicU32::new(0),
        data_calls: AtomicU32::new(0),
      })
    }

    fn pop(queue: &Mutex<VecDeque<bool>>) -> bool {
      queue.lock().expect("probe script lock").pop_front().unwrap_or(false)
    }
  }

  #[async_trait]
  impl HealthProbe for ScriptedProbe {
    async fn check_health(&self) -> Result<(), ProbeError> {
      self.health_calls.fetch_add(1, Ordering::Relaxed);
      if Self::pop(&self.health) {
        Ok(())
      } else {
        Err(ProbeError::Timeout)
      }
    }

    async fn check_data_readiness(&self) -> Result<(), ProbeError> {
      self.data_calls.fetch_add(1, Ordering::Relaxed);
      if Self::pop(&self.data) {
        Ok(())
      } else {
        Err(ProbeError::Status { code: 503 })
      }
    }
  }

  fn instant_gate(probe: Arc<ScriptedProbe>) -> ReadinessGate<ScriptedProbe> {
    ReadinessGate::new(probe, Duration::ZERO, Duration::ZERO)
  }

  /// Probe whose data step blocks until released, so the intermediate
  /// phase can be observed deterministically mid-cycle.
  struct GatedDataProbe {
    release: Notify,
  }

  #[async_trait]
  impl HealthProbe for GatedDataProbe {
    async fn check_health(&self) -> Result<(), ProbeError> {
      Ok(())
    }

    async fn check_data_readiness(&self) -> Result<(), ProbeError> {
      self.release.notified().await;
      Ok(())
    }
  }

  #[tokio::test]
  async fn test_success_path_visits_phases_in_order() {
    let probe = Arc::new(GatedDataProbe { release: Notify::new() });
    let gate = Arc::new(ReadinessGate::new(
      Arc::clone(&probe),
      Duration::ZERO,
      Duration::ZERO,
    ));
    assert_eq!(gate.snapshot().phase, Phase::AwaitingServer);

    let cycle = tokio::spawn({
      let gate = Arc::clone(&gate);
      async move { gate.run_check_cycle().await }
    });

    // Health succeeded, data probe is parked: intermediate phase visible.
    let mut rx = gate.subscribe();
    rx.wait_for(|s| s.phase == Phase::AwaitingData)
      .await
      .expect("sender alive");

    probe.release.notify_one();
    cycle.await.expect("cycle completes");

    let snap = gate.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert!(!snap.is_checking);
    assert_eq!(snap.server_check_attempts, 1);
    assert_eq!(snap.data_check_attempts, 1);
  }

  #[tokio::test]
  async fn test_health_failure_keeps_phase_and_counts() {
    let probe = ScriptedProbe::new(&[false, false, false], &[]);
    let gate = instant_gate(Arc::clone(&probe));

    for expected in 1..=3 {
      gate.run_check_cycle().await;
      let snap = gate.snapshot();
      assert_eq!(snap.phase, Phase::AwaitingServer);
      assert_eq!(snap.server_check_attempts, expected);
      assert_eq!(snap.data_check_attempts, 0);
      assert!(!snap.is_checking);
    }
  }

  #[tokio::test]
  async fn test_data_failure_stays_in_awaiting_data() {
    let probe = ScriptedProbe::new(&[true], &[false, false, true]);
    let gate = instant_gate(Arc::clone(&probe));

    // First cycle: health ok, data fails -> AwaitingData.
    gate.run_check_cycle().await;
    assert_eq!(gate.snapshot().phase, Phase::AwaitingData);
    assert_eq!(gate.snapshot().data_check_attempts, 1);

    // Next cycle skips the health probe entirely.
    gate.run_check_cycle().await;
    assert_eq!(probe.health_calls.load(Ordering::Relaxed), 1);
    assert_eq!(gate.snapshot().phase, Phase::AwaitingData);

    gate.run_check_cycle().await;
    assert_eq!(gate.snapshot().phase, Phase::Ready);
    assert_eq!(gate.snapshot().data_check_attempts, 3);
  }

  #[tokio::test]
  async fn test_ready_is_a_noop() {
    let probe = ScriptedProbe::new(&[true], &[true]);
    let gate = instant_gate(Arc::clone(&probe));

    gate.run_check_cycle().await;
    let before = gate.snapshot();
    assert_eq!(before.phase, Phase::Ready);

    gate.run_check_cycle().await;
    gate.run_check_cycle().await;

    assert_eq!(gate.snapshot(), before);
    assert_eq!(probe.health_calls.load(Ordering::Relaxed), 1);
    assert_eq!(probe.data_calls.load(Ordering::Relaxed), 1);
  }

  #[tokio::test]
  async fn test_counting_rule_two_failures_then_success() {
    // Health rejects twice then succeeds; data succeeds immediately.
    // Counting rule: every invocation increments, successful ones included.
    let probe = ScriptedProbe::new(&[false, false, true], &[true]);
    let gate = instant_gate(Arc::clone(&probe));

    gate.run_check_cycle().await;
    gate.run_check_cycle().await;
    gate.run_check_cycle().await;

    let snap = gate.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert_eq!(snap.server_check_attempts, 3);
    assert_eq!(snap.data_check_attempts, 1);
  }

  /// Probe that blocks until released, for exercising the in-flight guard.
  struct BlockingProbe {
    release: Notify,
    health_calls: AtomicU32,
  }

  #[async_trait]
  impl HealthProbe for BlockingProbe {
    async fn check_health(&self) -> Result<(), ProbeError> {
      self.health_calls.fetch_add(1, Ordering::Relaxed);
      self.release.notified().await;
      Ok(())
    }

    async fn check_data_readiness(&self) -> Result<(), ProbeError> {
      Ok(())
    }
  }

  #[tokio::test]
  async fn test_overlapping_cycles_issue_one_probe() {
    let probe = Arc::new(BlockingProbe {
      release: Notify::new(),
      health_calls: AtomicU32::new(0),
    });
    let gate = Arc::new(ReadinessGate::new(
      Arc::clone(&probe),
      Duration::ZERO,
      Duration::ZERO,
    ));

    let first = tokio::spawn({
      let gate = Arc::clone(&gate);
      async move { gate.run_check_cycle().await }
    });
    // Let the first cycle reach the probe await point.
    tokio::task::yield_now().await;

    // Second cycle must bail out at the guard without probing.
    gate.run_check_cycle().await;
    assert_eq!(probe.health_calls.load(Ordering::Relaxed), 1);
    assert_eq!(gate.snapshot().server_check_attempts, 1);

    probe.release.notify_one();
    first.await.expect("first cycle completes");
    assert_eq!(gate.snapshot().phase, Phase::Ready);
  }

  /// Probe whose first health call hangs forever; later calls succeed.
  struct StallFirstProbe {
    stalled: AtomicBool,
    parked: Notify,
  }

  #[async_trait]
  impl HealthProbe for StallFirstProbe {
    async fn check_health(&self) -> Result<(), ProbeError> {
      if !self.stalled.swap(true, Ordering::SeqCst) {
        // Never notified: parks until the owning future is dropped.
        self.parked.notified().await;
      }
      Ok(())
    }

    async fn check_data_readiness(&self) -> Result<(), ProbeError> {
      Ok(())
    }
  }

  #[tokio::test]
  async fn test_cancelled_cycle_releases_gate_for_reuse() {
    let probe = Arc::new(StallFirstProbe {
      stalled: AtomicBool::new(false),
      parked: Notify::new(),
    });
    let gate = Arc::new(ReadinessGate::new(
      Arc::clone(&probe),
      Duration::ZERO,
      Duration::ZERO,
    ));

    let cycle = tokio::spawn({
      let gate = Arc::clone(&gate);
      async move { gate.run_check_cycle().await }
    });
    let mut rx = gate.subscribe();
    rx.wait_for(|s| s.is_checking).await.expect("sender alive");

    // Cancel mid-probe, the way the poller does on shutdown.
    cycle.abort();
    let _ = cycle.await;

    // The slot and the indicator are both released...
    let snap = gate.snapshot();
    assert!(!snap.is_checking);
    assert_eq!(snap.phase, Phase::AwaitingServer);
    assert_eq!(snap.server_check_attempts, 1);

    // ...so the same instance keeps retrying and can still open.
    gate.run_check_cycle().await;
    let snap = gate.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert_eq!(snap.server_check_attempts, 2);
    assert_eq!(snap.data_check_attempts, 1);
  }
}
