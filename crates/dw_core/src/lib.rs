//! Driftwood core -- deterministic simulation primitives.
//!
//! Everything in this crate is pure game-state logic: integer-pixel geometry,
//! the frame animator, input snapshots with debounced edge triggers, and the
//! fixed-tick clock. Nothing here touches a window, a renderer, or an audio
//! device, so the whole simulation can be driven headlessly from recorded
//! input and produce identical state on every run.

pub mod animation;
pub mod geom;
pub mod input;
pub mod time;
