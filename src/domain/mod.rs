//! Domain layer - Readiness phases and snapshots.
//!
//! This module contains the pure state types for the cold-start readiness
//! machine. No external dependencies allowed here (hexagonal architecture
//! inner ring). All types are serializable and testable in isolation.

pub mod phase;

// Re-export core types for convenience
pub use phase::{Phase, ReadinessSnapshot};
