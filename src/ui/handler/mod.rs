//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_code_block, get_rating, health_check, list_code_blocks, submit_rating};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
