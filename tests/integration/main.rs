//! End-to-end tests across all layers
//!
//! These drive the full pipeline from declaration text to report rows and
//! check the properties that must hold for any input.

mod determinism;
mod properties;
mod scenario;
