pub mod autocomplete;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod page;
pub mod render;
pub mod session;
pub mod storage;

pub use autocomplete::{
    AutocompleteController, ControllerSettings, Direction, Effect, Event, PointerTarget,
    WidgetState, WidgetView,
};
pub use config::AppConfig;
pub use error::{ExitCode, PretgoError, Result};
pub use models::*;

pub use lookup::{HttpLookup, Lookup, LookupError, SqliteLookup};
pub use page::{BannerQueue, Level, NavLink, PageClock};
pub use render::{EntryView, ListView, SelectionPanel, render_list_html, render_panel_html};
pub use session::{AutocompleteSession, ResetHandle, SessionEvent, SessionHandle};
pub use storage::ConnectionPool;
