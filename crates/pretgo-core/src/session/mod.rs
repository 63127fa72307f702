//! Tokio host for one [`AutocompleteController`](crate::autocomplete::AutocompleteController).
//!
//! Every event, whether it comes from the user, a timer or a finished lookup,
//! is funnelled through a single task, so the controller has one writer.

mod handle;
mod runtime;

pub use handle::{ResetHandle, SessionHandle};
pub use runtime::{AutocompleteSession, SessionEvent};
