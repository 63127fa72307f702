use tokio::sync::mpsc::UnboundedSender;

use crate::autocomplete::{Direction, Event, PointerTarget};
use crate::error::{PretgoError, Result};

/// Sends user-side events to a running session. Cheap to clone; the session
/// stops once every handle is gone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<Event>,
}

impl SessionHandle {
    pub(crate) fn new(tx: UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: Event) -> Result<()> {
        self.tx.send(event).map_err(|_| PretgoError::SessionClosed)
    }

    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::InputChanged(text.into()))
    }

    pub fn pointer(&self, target: PointerTarget) -> Result<()> {
        self.send(Event::Pointer(target))
    }

    pub fn move_highlight(&self, direction: Direction) -> Result<()> {
        self.send(Event::MoveHighlight(direction))
    }

    pub fn activate(&self, index: usize) -> Result<()> {
        self.send(Event::Activate(index))
    }

    pub fn activate_highlighted(&self) -> Result<()> {
        self.send(Event::ActivateHighlighted)
    }

    pub fn activate_create(&self) -> Result<()> {
        self.send(Event::ActivateCreate)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(Event::Reset)
    }

    /// Handle that can only reset the widget, for code that clears the
    /// surrounding form.
    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            tx: self.tx.clone(),
        }
    }
}

/// Restores the widget to an empty, focused input.
#[derive(Debug, Clone)]
pub struct ResetHandle {
    tx: UnboundedSender<Event>,
}

impl ResetHandle {
    pub fn reset(&self) -> Result<()> {
        self.tx.send(Event::Reset).map_err(|_| PretgoError::SessionClosed)
    }
}
