//! Realtime collaborative code-block editing library.
//!
//! This library provides the server side of a collaborative code-editing
//! application: one mentor and many students join a room bound to a code
//! block, edits are broadcast to the whole room last-writer-wins, and each
//! code block carries a running difficulty rating.

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod time;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run as run_server;
