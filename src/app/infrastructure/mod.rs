//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - FLTK buffer utilities
//! - Window-manager calls (opacity, pinning, focus)
//! - Shell "Open With" registration
//! - Error types

pub mod buffer;
pub mod error;
pub mod platform;
pub mod shell;
