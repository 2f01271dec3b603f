//! HTTP surface for transport adapters.
//!
//! Thin JSON wrappers around the dispatcher: a direct `/chat` endpoint, a
//! WhatsApp Business `/webhook`, session inspection and a health probe.
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer, ServerError};
pub use types::ApiContext;
