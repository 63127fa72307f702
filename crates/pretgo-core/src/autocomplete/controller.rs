use std::time::Duration;

use tracing::{debug, info, warn};

use super::event::{Direction, Effect, Event, PointerTarget, RequestId, TimerToken};
use super::state::{WidgetState, WidgetView};
use crate::config::AppConfig;
use crate::models::{Candidate, Query, Selection};
use crate::render::{EntryView, ListView, SelectionPanel};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub create_href: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            min_query_chars: 1,
            create_href: "/personnes/ajouter".to_string(),
        }
    }
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_chars: config.autocomplete.min_query_chars.max(1),
            create_href: config.autocomplete.create_href.clone(),
        }
    }
}

/// Last rendered lookup outcome.
#[derive(Debug, Clone, Default)]
enum Results {
    #[default]
    Nothing,
    Candidates(Vec<Candidate>),
    Empty {
        query: String,
    },
}

/// One search widget instance.
#[derive(Debug)]
pub struct AutocompleteController {
    settings: ControllerSettings,
    state: WidgetState,
    input: String,
    input_focused: bool,
    pending_timer: Option<TimerToken>,
    next_token: u64,
    next_request: u64,
    /// Latest issued lookup and the query it was issued for.
    in_flight: Option<(RequestId, String)>,
    /// Shown list; `Nothing` means hidden.
    results: Results,
    highlighted: Option<usize>,
    selection: Option<Selection>,
}

impl AutocompleteController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            state: WidgetState::Idle,
            input: String::new(),
            input_focused: false,
            pending_timer: None,
            next_token: 0,
            next_request: 0,
            in_flight: None,
            results: Results::Nothing,
            highlighted: None,
            selection: None,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.pending_timer
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Feed one event; returns the effects the host must carry out, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            Event::InputChanged(text) => self.on_input(text, &mut effects),
            Event::TimerFired(token) => self.on_timer(token, &mut effects),
            Event::LookupSucceeded {
                request,
                candidates,
            } => self.on_response(request, candidates),
            Event::LookupFailed { request, message } => self.on_failure(request, &message),
            Event::Pointer(target) => self.on_pointer(target),
            Event::MoveHighlight(direction) => self.move_highlight(direction),
            Event::Activate(index) => self.activate(index, &mut effects),
            Event::ActivateHighlighted => {
                if let Some(index) = self.highlighted {
                    self.activate(index, &mut effects);
                }
            }
            Event::ActivateCreate => self.activate_create(&mut effects),
            Event::Reset => self.reset(&mut effects),
        }
        effects
    }

    pub fn view(&self) -> WidgetView {
        let list = match &self.results {
            Results::Nothing => ListView::Hidden,
            Results::Candidates(candidates) => ListView::Candidates {
                entries: candidates.iter().map(EntryView::from).collect(),
                highlighted: self.highlighted,
            },
            Results::Empty { query } => ListView::NoResults {
                query: query.clone(),
                create_href: self.settings.create_href.clone(),
            },
        };

        WidgetView {
            state: self.state,
            input_text: self.input.clone(),
            input_visible: self.selection.is_none(),
            panel: self.selection.as_ref().map(SelectionPanel::from),
            list,
            hidden_field: self
                .selection
                .as_ref()
                .map(|s| s.candidate_id.to_string())
                .unwrap_or_default(),
            input_focused: self.input_focused,
        }
    }

    // ─── Transitions ───────────────────────────────────────

    fn on_input(&mut self, text: String, effects: &mut Vec<Effect>) {
        if self.state == WidgetState::Selected {
            debug!("input change ignored while a selection is shown");
            return;
        }

        self.input = text;
        self.input_focused = true;
        self.cancel_pending(effects);

        let query = Query::parse(&self.input);
        if !query.is_searchable(self.settings.min_query_chars) {
            self.in_flight = None;
            self.hide_list();
            self.state = WidgetState::Idle;
            return;
        }

        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending_timer = Some(token);
        self.state = WidgetState::Typing;
        effects.push(Effect::ScheduleTimer {
            token,
            delay: self.settings.debounce,
        });
    }

    fn on_timer(&mut self, token: TimerToken, effects: &mut Vec<Effect>) {
        if self.pending_timer != Some(token) {
            debug!(token = token.0, "ignoring superseded debounce timer");
            return;
        }
        self.pending_timer = None;

        let query = Query::parse(&self.input);
        if !query.is_searchable(self.settings.min_query_chars) {
            return;
        }

        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.in_flight = Some((request, query.as_str().to_string()));
        debug!(%request, query = query.as_str(), "issuing person lookup");
        effects.push(Effect::Lookup {
            request,
            query: query.as_str().to_string(),
        });
    }

    fn on_response(&mut self, request: RequestId, candidates: Vec<Candidate>) {
        let query = match self.in_flight.take() {
            Some((latest, query)) if latest == request => query,
            other => {
                self.in_flight = other;
                debug!(%request, "dropping stale lookup response");
                return;
            }
        };

        if candidates.is_empty() {
            self.results = Results::Empty { query };
            self.highlighted = None;
        } else {
            self.results = Results::Candidates(candidates);
            self.highlighted = Some(0);
        }
        self.state = if self.pending_timer.is_some() {
            WidgetState::Typing
        } else {
            WidgetState::ShowingResults
        };
    }

    fn on_failure(&mut self, request: RequestId, message: &str) {
        match &self.in_flight {
            Some((latest, query)) if *latest == request => {
                warn!(%request, query = query.as_str(), "person lookup failed: {message}");
                self.in_flight = None;
                if self.pending_timer.is_none() {
                    self.state = match self.results {
                        Results::Nothing => WidgetState::Idle,
                        _ => WidgetState::ShowingResults,
                    };
                }
            }
            _ => debug!(%request, "ignoring failure of a stale lookup: {message}"),
        }
    }

    fn on_pointer(&mut self, target: PointerTarget) {
        match target {
            PointerTarget::Outside => {
                self.input_focused = false;
                self.hide_list();
            }
            PointerTarget::Input => {
                if self.selection.is_none() {
                    self.input_focused = true;
                }
            }
            PointerTarget::ResultList => {}
        }
    }

    fn move_highlight(&mut self, direction: Direction) {
        let len = match &self.results {
            Results::Candidates(candidates) => candidates.len(),
            _ => return,
        };
        let next = match (self.highlighted, direction) {
            (None, Direction::Down) => 0,
            (None, Direction::Up) => len - 1,
            (Some(i), Direction::Down) => (i + 1) % len,
            (Some(i), Direction::Up) => (i + len - 1) % len,
        };
        self.highlighted = Some(next);
    }

    fn activate(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let candidate = match &self.results {
            Results::Candidates(candidates) => match candidates.get(index) {
                Some(c) => c.clone(),
                None => {
                    debug!(index, "activation ignored, no such entry");
                    return;
                }
            },
            _ => {
                debug!(index, "activation ignored, no candidates shown");
                return;
            }
        };

        self.cancel_pending(effects);
        self.in_flight = None;
        self.hide_list();

        let selection = Selection::from(&candidate);
        info!(id = %selection.candidate_id, "person selected");
        self.selection = Some(selection.clone());
        self.input_focused = false;
        self.state = WidgetState::Selected;
        effects.push(Effect::SelectionCommitted(selection));
    }

    fn activate_create(&mut self, effects: &mut Vec<Effect>) {
        if matches!(self.results, Results::Empty { .. }) {
            effects.push(Effect::OpenCreateForm {
                href: self.settings.create_href.clone(),
            });
        }
    }

    fn reset(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_pending(effects);
        self.in_flight = None;
        self.hide_list();
        self.selection = None;
        self.input.clear();
        self.input_focused = true;
        self.state = WidgetState::Idle;
        effects.push(Effect::SelectionCleared);
        effects.push(Effect::FocusInput);
    }

    // ─── Helpers ───────────────────────────────────────────

    fn cancel_pending(&mut self, effects: &mut Vec<Effect>) {
        if let Some(token) = self.pending_timer.take() {
            effects.push(Effect::CancelTimer(token));
        }
    }

    fn hide_list(&mut self) {
        self.results = Results::Nothing;
        self.highlighted = None;
    }
}

impl Default for AutocompleteController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}
