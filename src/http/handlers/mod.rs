//! HTTP request handlers

pub mod status;
pub mod validate;

// Re-export AppState (used by all handlers)
pub use status::AppState;
