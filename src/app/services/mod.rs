//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Plain-text file reading and writing
//! - Single-instance hand-off
//! - Text operations

pub mod file_io;
pub mod instance;
pub mod text_ops;
