//! Controllers layer - orchestration and coordination.
//!
//! Coordinates domain models, services and the UI for each open editor
//! window.

pub mod windows;
