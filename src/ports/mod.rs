//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `HealthProbe`: backend liveness and data-readiness checks

pub mod probe;

pub use probe::{HealthProbe, ProbeError};
