//! Server Status Service - App-lifetime Sleeping/Awake Flag
//!
//! A single shared `is_server_sleeping` flag for the whole application,
//! plus an inversion-of-control trigger: the API-calling layer is handed a
//! `StatusHandle` at startup so that a failed request deep in the call
//! stack can ask for a re-check without importing this module's owner.
//!
//! Independent of any `ReadinessGate` instance; the two share only the
//! probe collaborator.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ports::HealthProbe;

/// Capacity of the trigger channel. Bursts beyond this are coalesced into
/// the re-checks already queued.
const TRIGGER_BUFFER: usize = 8;

/// Application-lifetime backend status.
///
/// The flag defaults to `false` (not sleeping) and is mutated only by
/// `check_server_status`; every other party is a reader.
pub struct ServerStatusService<P: HealthProbe> {
  /// Probe collaborator shared with the readiness gates.
  probe: Arc<P>,
  /// Last known sleeping/unreachable status.
  sleeping_tx: watch::Sender<bool>,
}

impl<P: HealthProbe> ServerStatusService<P> {
  /// Create the service with the flag cleared.
  pub fn new(probe: Arc<P>) -> Self {
    let (sleeping_tx, _sleeping_rx) = watch::channel(false);
    Self { probe, sleeping_tx }
  }

  /// Subscribe to sleeping-flag changes.
  pub fn subscribe(&self) -> watch::Receiver<bool> {
    self.sleeping_tx.subscribe()
  }

  /// Last known sleeping status.
  pub fn is_server_sleeping(&self) -> bool {
    *self.sleeping_tx.borrow()
  }

  /// Probe the backend and fold the outcome into the flag.
  ///
  /// Success clears the flag, failure sets it. Side effect only; callers
  /// observe the result through `subscribe`/`is_server_sleeping`.
  pub async fn check_server_status(&self) {
    match self.probe.check_health().await {
      Ok(()) => {
        if self.is_server_sleeping() {
          info!("Backend answered, clearing sleeping flag");
        }
        self.sleeping_tx.send_if_modified(|sleeping| {
          let changed = *sleeping;
          *sleeping = false;
          changed
        });
      }
      Err(e) => {
        warn!(error = %e, "Backend unreachable, marking as sleeping");
        self.sleeping_tx.send_if_modified(|sleeping| {
          let changed = !*sleeping;
          *sleeping = true;
          changed
        });
      }
    }
  }

  /// Spawn the trigger listener and hand out the API layer's handle.
  ///
  /// The listener drains trigger notifications, coalescing bursts (ten
  /// failed requests during one outage should not queue ten probes), and
  /// runs `check_server_status` once per batch. It stops on shutdown or
  /// when every handle is dropped.
  pub fn spawn_trigger_listener(
    self: &Arc<Self>,
    mut shutdown_rx: broadcast::Receiver<()>,
  ) -> (StatusHandle, JoinHandle<()>) {
    let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(TRIGGER_BUFFER);
    let service = Arc::clone(self);

    let join = tokio::spawn(async move {
      loop {
        tokio::select! {
          biased;
          _ = shutdown_rx.recv() => {
            info!("Status trigger listener shutting down");
            return;
          }
          notified = trigger_rx.recv() => {
            let Some(()) = notified else {
              debug!("All status handles dropped, listener exiting");
              return;
            };
            // Coalesce whatever piled up behind this notification.
            while trigger_rx.try_recv().is_ok() {}
            service.check_server_status().await;
          }
        }
      }
    });

    (StatusHandle { trigger_tx }, join)
  }
}

/// Cloneable trigger handed to the API-calling layer at startup.
///
/// Fire-and-forget: losing a notification because the buffer is full is
/// fine, since a re-check is already queued in that case.
#[derive(Clone)]
pub struct StatusHandle {
  trigger_tx: mpsc::Sender<()>,
}

impl StatusHandle {
  /// Report that an API call failed in an availability-shaped way.
  pub fn notify_unavailable(&self) {
    if self.trigger_tx.try_send(()).is_err() {
      debug!("Status trigger buffer full, re-check already pending");
    }
  }
}
