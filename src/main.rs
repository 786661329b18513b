//! wakegate — Entry Point
//!
//! Demo wiring for the readiness gate: blocks "application start" behind
//! the startup splash until the backend wakes, then keeps the server
//! status service and the recheck dialog alive until SIGINT.
//!
//! Wiring sequence:
//! 1. Load wakegate.toml (defaults if absent) + validate
//! 2. Init tracing (env-filter over configured level)
//! 3. Create shutdown broadcast, forward SIGINT into it
//! 4. Create HttpProbe (implements the HealthProbe port)
//! 5. Run the startup gate: splash renderer + readiness poller
//! 6. Create ServerStatusService + hand its StatusHandle to the API layer
//! 7. Spawn the recheck-dialog watcher (fresh gate per opening)
//! 8. Wait for shutdown → drain background tasks

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::api::HttpProbe;
use adapters::console::render::{render_modal, render_splash};
use config::TimingConfig;
use usecases::poller::{PollOutcome, ReadinessPoller};
use usecases::readiness::ReadinessGate;
use usecases::status::ServerStatusService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config("wakegate.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.api.base_url,
        "Starting wakegate"
    );

    // ── 3. Shutdown signal channel, fed by SIGINT ───────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    {
        let shutdown_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("SIGINT received, initiating shutdown");
                let _ = shutdown_tx.send(());
            }
        });
    }

    // ── 4. Probe adapter (HealthProbe port) ─────────────────
    let probe = Arc::new(HttpProbe::new(&config.api).context("Failed to create HTTP probe")?);

    // ── 5. Startup gate: splash + poller until ready ────────
    let startup_gate = Arc::new(ReadinessGate::new(
        Arc::clone(&probe),
        config.timing.probe_gap(),
        config.timing.checking_flash(),
    ));
    let splash = tokio::spawn(render_splash(startup_gate.subscribe()));
    let poller = ReadinessPoller::new(
        Arc::clone(&startup_gate),
        config.timing.poll_interval(),
        config.timing.splash_ready_hold(),
    );

    match poller.run(shutdown_tx.subscribe()).await {
        PollOutcome::Ready => {
            let _ = splash.await;
            info!("Backend ready, application unlocked");
        }
        PollOutcome::Cancelled => {
            splash.abort();
            info!("Cancelled during startup, exiting");
            return Ok(());
        }
    }

    // ── 6. App-lifetime status service + API-layer handle ───
    let status = Arc::new(ServerStatusService::new(Arc::clone(&probe)));
    let (status_handle, listener_join) = status.spawn_trigger_listener(shutdown_tx.subscribe());
    // The real application registers this handle with its HTTP layer so a
    // failed request can trigger a re-check; the demo just keeps it alive.
    let _api_layer_handle = status_handle;

    // ── 7. Recheck dialog watcher ───────────────────────────
    let watcher_join = tokio::spawn(watch_server_status(
        Arc::clone(&probe),
        Arc::clone(&status),
        config.timing.clone(),
        shutdown_tx.clone(),
    ));

    // ── 8. Wait for shutdown, then drain ────────────────────
    let mut shutdown_rx = shutdown_tx.subscribe();
    let _ = shutdown_rx.recv().await;

    if tokio::time::timeout(Duration::from_secs(5), async {
        let _ = watcher_join.await;
        let _ = listener_join.await;
    })
    .await
    .is_err()
    {
        warn!("Background tasks did not drain in time");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Surface the recheck dialog whenever the status service reports the
/// backend as sleeping, using a fresh gate instance per opening.
async fn watch_server_status(
    probe: Arc<HttpProbe>,
    status: Arc<ServerStatusService<HttpProbe>>,
    timing: TimingConfig,
    shutdown_tx: broadcast::Sender<()>,
) {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut sleeping_rx = status.subscribe();

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => return,
            changed = sleeping_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                if !*sleeping_rx.borrow_and_update() {
                    continue;
                }

                info!("Backend unavailable, opening recheck dialog");
                let gate = Arc::new(ReadinessGate::new(
                    Arc::clone(&probe),
                    timing.probe_gap(),
                    timing.checking_flash(),
                ));
                let dialog = tokio::spawn(render_modal(gate.subscribe()));
                let poller = ReadinessPoller::new(
                    Arc::clone(&gate),
                    timing.poll_interval(),
                    timing.modal_ready_hold(),
                );

                match poller.run(shutdown_tx.subscribe()).await {
                    PollOutcome::Ready => {
                        // Clears the sleeping flag via its own probe.
                        status.check_server_status().await;
                        let _ = dialog.await;
                        info!("Recheck dialog closed");
                    }
                    PollOutcome::Cancelled => {
                        dialog.abort();
                        return;
                    }
                }
            }
        }
    }
}
