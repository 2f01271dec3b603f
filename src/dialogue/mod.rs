pub mod classify;
pub mod dispatcher;
pub mod router;
pub mod voice;

pub use classify::classify;
pub use dispatcher::{Dispatcher, ProcessedMessage};
pub use router::{RouteOutcome, Router};

use thiserror::Error;

use crate::session::StoreError;
use crate::templates::TemplateError;

/// Failures that abort processing of one message.
///
/// Completion failures never appear here: they degrade to the fixed
/// fallback prompt.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("User id must not be empty")]
    EmptyUserId,

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
