//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates the readiness domain state with the probe port to
//! implement the gate's core workflows. Each use case is a self-contained
//! operation.
//!
//! Use cases:
//! - `ReadinessGate`: phase state machine driven by probe outcomes
//! - `ReadinessPoller`: fixed-interval polling until the gate opens
//! - `ServerStatusService`: app-lifetime sleeping/awake status with an
//!   inversion-of-control trigger for the API-calling layer

pub mod poller;
pub mod readiness;
pub mod status;

pub use poller::{PollOutcome, ReadinessPoller};
pub use readiness::ReadinessGate;
pub use status::{ServerStatusService, StatusHandle};
