//! HTTP server implementation for the validation gateway
//!
//! Two route families (`/pc/...` and `/api/v1/...`) expose the same
//! handlers. CORS, compression and access logging are tower layers.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod server;

pub use errors::{HttpError, HttpResult};
pub use models::ResponseEnvelope;
/// Re-export commonly used types
pub use server::GatewayServer;
