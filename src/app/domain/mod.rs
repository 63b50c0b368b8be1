//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document (path, dirty flag, on-disk format)
//! - Editor settings and their value palettes
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod settings;

pub use document::Document;
pub use messages::{Message, WindowId};
pub use settings::{EditorColor, EditorFont, EditorSettings};
