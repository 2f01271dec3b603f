//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::dialogue::Dispatcher;

/// Longest accepted message body, in bytes. WhatsApp caps text at 4096
/// characters.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024;

/// User id used by `/chat` when the caller omits one.
pub const DEFAULT_CHAT_USER: &str = "default_user";

/// User id used by `/webhook` when the sender is missing.
pub const UNKNOWN_WEBHOOK_USER: &str = "unknown";

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub dispatcher: Arc<Dispatcher>,
}

impl ApiContext {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}
