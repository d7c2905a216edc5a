//! Platform abstraction layer
//!
//! Turns raw device input into the engine's per-frame `FrameInput`:
//! - Hand landmarks and mouse position become a `PointerSample`
//! - Pinch gestures and clicks become a debounced activation
//!
//! Camera capture and landmark extraction happen outside the crate.

pub mod input;

pub use input::{ActivationGate, HandObservation, InputAdapter, PointerSample};
