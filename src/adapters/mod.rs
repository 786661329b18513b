//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies, and holds the thin presentation shells. Each
//! sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: HTTP probe client against the remote backend
//! - `console`: phase-to-visual mapping and terminal rendering

pub mod api;
pub mod console;
