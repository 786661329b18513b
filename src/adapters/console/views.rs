//! Pure phase-to-visual mapping for the two presentation shells.
//!
//! The user only ever sees "please wait, we are waking the server up"
//! framing. Probe errors never surface here — no codes, no traces — only
//! the current phase, a spinner flag, and a gentle hint once attempts
//! pile up.

use crate::domain::{Phase, ReadinessSnapshot};

/// Attempts after which the views start mentioning the wait explicitly.
const PATIENCE_HINT_ATTEMPTS: u32 = 3;

/// Display state of the full-screen startup splash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashView {
    /// Large headline line.
    pub headline: &'static str,
    /// Supporting detail line.
    pub detail: String,
    /// Whether a spinner should be shown.
    pub spinner: bool,
}

/// Display state of the recheck dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub body: String,
    /// Whether a spinner should be shown.
    pub spinner: bool,
}

/// Map a snapshot to the startup splash's visual state.
pub fn splash_view(snapshot: &ReadinessSnapshot) -> SplashView {
    match snapshot.phase {
        Phase::AwaitingServer => SplashView {
            headline: "Waking the server up",
            detail: patience_detail(
                snapshot.server_check_attempts,
                "This can take up to a minute after a long idle period.",
            ),
            spinner: snapshot.is_checking,
        },
        Phase::AwaitingData => SplashView {
            headline: "Almost there",
            detail: patience_detail(
                snapshot.data_check_attempts,
                "The server is up, loading data services...",
            ),
            spinner: snapshot.is_checking,
        },
        Phase::Ready => SplashView {
            headline: "Ready",
            detail: "Taking you in.".to_string(),
            spinner: false,
        },
    }
}

/// Map a snapshot to the recheck dialog's visual state.
pub fn modal_view(snapshot: &ReadinessSnapshot) -> ModalView {
    match snapshot.phase {
        Phase::AwaitingServer => ModalView {
            title: "Connection lost",
            body: patience_detail(
                snapshot.server_check_attempts,
                "The server seems to be asleep. Reconnecting...",
            ),
            spinner: snapshot.is_checking,
        },
        Phase::AwaitingData => ModalView {
            title: "Reconnecting",
            body: "The server answered, restoring data access...".to_string(),
            spinner: snapshot.is_checking,
        },
        Phase::Ready => ModalView {
            title: "Connection restored",
            body: "You're back online.".to_string(),
            spinner: false,
        },
    }
}

/// Base message, with a patience hint once several attempts have failed.
fn patience_detail(attempts: u32, base: &str) -> String {
    if attempts > PATIENCE_HINT_ATTEMPTS {
        format!("{base} Still trying (attempt {attempts}).")
    } else {
        base.to_string()
    }
}
