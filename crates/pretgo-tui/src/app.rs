use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use pretgo_core::page::{self, BannerQueue, Level, NavLink, PageClock};
use pretgo_core::{
    AppConfig, AutocompleteController, AutocompleteSession, ControllerSettings, Lookup,
    Selection, SessionEvent, SessionHandle, WidgetView,
};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::theme::NordTheme;

/// Terminal host state around one autocomplete session.
pub struct PickerApp {
    pub session: SessionHandle,
    view_rx: watch::Receiver<WidgetView>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,

    /// Latest snapshot published by the session.
    pub view: WidgetView,
    /// Local edit buffer; keystrokes outrun view updates.
    pub input: String,
    pub selection: Option<Selection>,

    pub nav: Vec<NavLink>,
    pub clock: PageClock,
    pub clock_text: String,
    last_clock: Instant,
    pub banners: BannerQueue,
    pub base_url: String,

    pub theme: NordTheme,
    pub should_quit: bool,
    pub cancelled: bool,
}

impl PickerApp {
    /// Spawns the session on the current tokio runtime.
    pub fn new(config: &AppConfig, lookup: Arc<dyn Lookup>) -> Result<Self> {
        let controller = AutocompleteController::new(ControllerSettings::from(config));
        let session = AutocompleteSession::spawn(controller, lookup);

        let mut nav = page::default_links();
        page::mark_active(&mut nav, &config.page.current_path);

        let clock = PageClock::from_config(&config.page)?;
        let clock_text = clock.now_text();
        let view = session.view.borrow().clone();

        Ok(Self {
            session: session.handle,
            view_rx: session.view,
            events_rx: session.events,
            view,
            input: String::new(),
            selection: None,
            nav,
            clock,
            clock_text,
            last_clock: Instant::now(),
            banners: BannerQueue::new(std::time::Duration::from_millis(
                config.page.notification_ttl_ms,
            )),
            base_url: config.lookup.base_url.clone(),
            theme: NordTheme::default(),
            should_quit: false,
            cancelled: false,
        })
    }

    /// Pulls session output and advances the clock and banners.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.on_session_event(event, now);
        }
        self.view = self.view_rx.borrow_and_update().clone();

        if self.clock.needs_refresh(self.last_clock, now) {
            self.clock_text = self.clock.now_text();
            self.last_clock = now;
        }
        self.banners.expire(now);
    }

    fn on_session_event(&mut self, event: SessionEvent, now: Instant) {
        debug!(?event, "session event");
        match event {
            SessionEvent::SelectionCommitted(selection) => {
                self.banners.push(
                    Level::Success,
                    format!("Personne sélectionnée : {}", selection.label),
                    now,
                );
                self.selection = Some(selection);
            }
            SessionEvent::SelectionCleared => {
                self.selection = None;
                self.input.clear();
            }
            SessionEvent::FocusInput => {}
            SessionEvent::OpenCreateForm { href } => {
                self.banners.push(
                    Level::Info,
                    format!(
                        "Créer une nouvelle personne : {}{}",
                        self.base_url.trim_end_matches('/'),
                        href
                    ),
                    now,
                );
            }
        }
    }

    pub fn type_char(&mut self, c: char) -> Result<()> {
        if !self.view.input_visible {
            return Ok(());
        }
        self.input.push(c);
        self.session.input(self.input.clone())?;
        Ok(())
    }

    pub fn backspace(&mut self) -> Result<()> {
        if !self.view.input_visible || self.input.pop().is_none() {
            return Ok(());
        }
        self.session.input(self.input.clone())?;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        self.input.clear();
        self.session.reset()?;
        Ok(())
    }

    /// Closes the newest banner; false when none is shown.
    pub fn dismiss_banner(&mut self) -> bool {
        match self.banners.visible().last().map(|b| b.id) {
            Some(id) => self.banners.dismiss(id),
            None => false,
        }
    }

    pub fn quit(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
        self.should_quit = true;
    }

    /// Selection to hand back once the loop ends.
    pub fn outcome(&self) -> Option<Selection> {
        if self.cancelled {
            None
        } else {
            self.selection.clone()
        }
    }
}
