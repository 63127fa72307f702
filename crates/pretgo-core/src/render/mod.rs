//! View models for the autocomplete widget and their escaped HTML form.

mod html;
mod view;

pub use html::{render_list_html, render_panel_html};
pub use view::{EntryView, ListView, SelectionPanel};
