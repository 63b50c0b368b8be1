//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Settings, Messages)
//! - `controllers/` - Orchestration (WindowManager)
//! - `services/` - Business operations (file I/O, instance hand-off, text_ops)
//! - `infrastructure/` - External integrations (FLTK buffer, platform, shell, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::windows::{EditorWindow, WindowManager};
pub use domain::{Document, EditorColor, EditorFont, EditorSettings, Message, WindowId};
pub use infrastructure::error::AppError;
pub use services::instance::{HandoffRequest, InstanceChannel};
pub use state::AppState;
