use serde::Serialize;

use crate::render::{ListView, SelectionPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    /// Nothing shown and nothing pending.
    #[default]
    Idle,
    /// Waiting for the debounce timer or for the lookup it issued.
    Typing,
    /// A response has been rendered (the list may since have been dismissed).
    ShowingResults,
    /// Confirmation panel shown, input hidden.
    Selected,
}

/// Snapshot of everything a host needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub state: WidgetState,
    pub input_text: String,
    pub input_visible: bool,
    /// Present exactly when the input is hidden.
    pub panel: Option<SelectionPanel>,
    pub list: ListView,
    /// Value submitted with the form; empty when nothing is selected.
    pub hidden_field: String,
    pub input_focused: bool,
}

impl WidgetView {
    pub fn panel_visible(&self) -> bool {
        self.panel.is_some()
    }
}
