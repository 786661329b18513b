//! Backend API Adapters - HTTP Probe Client
//!
//! Implements the `HealthProbe` port over reqwest against the remote
//! backend's health and trivial-data endpoints.

pub mod probe;

pub use probe::HttpProbe;
