//! Terminal rendering loops for the demo binary.
//!
//! Re-renders on every watch-channel change and stops once the gate
//! reports ready (the caller handles what comes after) or the publishing
//! side goes away.

use tokio::sync::watch;

use super::views::{modal_view, splash_view};
use crate::domain::ReadinessSnapshot;

/// Render the startup splash until the gate opens.
pub async fn render_splash(mut state_rx: watch::Receiver<ReadinessSnapshot>) {
    loop {
        let snapshot = state_rx.borrow_and_update().clone();
        let view = splash_view(&snapshot);
        let spinner = if view.spinner { " [checking]" } else { "" };
        println!("  {}{} — {}", view.headline, spinner, view.detail);

        if snapshot.is_ready() || state_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Render the recheck dialog until its gate opens.
pub async fn render_modal(mut state_rx: watch::Receiver<ReadinessSnapshot>) {
    loop {
        let snapshot = state_rx.borrow_and_update().clone();
        let view = modal_view(&snapshot);
        let spinner = if view.spinner { " [checking]" } else { "" };
        println!("  [{}]{} {}", view.title, spinner, view.body);

        if snapshot.is_ready() || state_rx.changed().await.is_err() {
            return;
        }
    }
}
