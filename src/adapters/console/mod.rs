//! Console Presentation - Phase-to-Visual Mapping and Rendering
//!
//! The original design puts two shells over the same machine: a
//! full-screen startup splash and a recheck dialog surfaced when a later
//! API call fails. Both reduce to a pure mapping from a readiness snapshot
//! to display text; the mapping lives in `views` and is the only part of
//! this layer with testable behavior. `render` is the thin terminal loop
//! the demo binary uses.

pub mod render;
pub mod views;

pub use views::{ModalView, SplashView, modal_view, splash_view};
