use std::fmt;
use std::time::Duration;

use crate::models::{Candidate, Selection};

/// Identifies one scheduled debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Sequence number of an issued lookup. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    ResultList,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Inputs to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    InputChanged(String),
    TimerFired(TimerToken),
    LookupSucceeded {
        request: RequestId,
        candidates: Vec<Candidate>,
    },
    LookupFailed {
        request: RequestId,
        message: String,
    },
    Pointer(PointerTarget),
    MoveHighlight(Direction),
    Activate(usize),
    ActivateHighlighted,
    ActivateCreate,
    Reset,
}

/// Work the host must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ScheduleTimer { token: TimerToken, delay: Duration },
    CancelTimer(TimerToken),
    Lookup { request: RequestId, query: String },
    SelectionCommitted(Selection),
    /// Hidden field and input text were cleared.
    SelectionCleared,
    FocusInput,
    OpenCreateForm { href: String },
}
