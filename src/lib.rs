//! Shard: a small terminal-styled plain-text editor.

pub mod app;
pub mod ui;
