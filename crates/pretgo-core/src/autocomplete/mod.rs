//! Person search widget as an explicit state machine.
//!
//! The controller never touches clocks, sockets or a DOM. Hosts feed it
//! [`Event`]s and carry out the [`Effect`]s it returns; the current
//! [`WidgetView`] can be read at any time.

mod controller;
mod event;
mod state;

#[cfg(test)]
pub(crate) mod harness;

pub use controller::{AutocompleteController, ControllerSettings};
pub use event::{Direction, Effect, Event, PointerTarget, RequestId, TimerToken};
pub use state::{WidgetState, WidgetView};
