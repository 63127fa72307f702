//! Virtual-time driver for controller tests.

use std::collections::BTreeMap;
use std::time::Duration;

use super::controller::{AutocompleteController, ControllerSettings};
use super::event::{Effect, Event, RequestId, TimerToken};
use super::state::WidgetView;
use crate::models::Candidate;

pub(crate) struct Harness {
    pub controller: AutocompleteController,
    now: Duration,
    timers: BTreeMap<TimerToken, Duration>,
    /// Every lookup issued, in order.
    pub lookups: Vec<(RequestId, String)>,
    pub cancelled: Vec<TimerToken>,
    /// Effects other than timer and lookup bookkeeping.
    pub effects: Vec<Effect>,
}

impl Harness {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            controller: AutocompleteController::new(settings),
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            lookups: Vec::new(),
            cancelled: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn send(&mut self, event: Event) {
        let effects = self.controller.handle(event);
        for effect in effects {
            match effect {
                Effect::ScheduleTimer { token, delay } => {
                    self.timers.insert(token, self.now + delay);
                }
                Effect::CancelTimer(token) => {
                    self.timers.remove(&token);
                    self.cancelled.push(token);
                }
                Effect::Lookup { request, query } => self.lookups.push((request, query)),
                other => self.effects.push(other),
            }
        }
    }

    pub fn type_text(&mut self, text: &str) {
        self.send(Event::InputChanged(text.to_string()));
    }

    /// Moves the clock forward, firing due timers in deadline order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let due = self
                .timers
                .iter()
                .filter(|(_, at)| **at <= target)
                .min_by_key(|(_, at)| **at)
                .map(|(token, at)| (*token, *at));
            let Some((token, at)) = due else { break };
            self.timers.remove(&token);
            self.now = at;
            self.send(Event::TimerFired(token));
        }
        self.now = target;
    }

    pub fn respond(&mut self, request: RequestId, candidates: Vec<Candidate>) {
        self.send(Event::LookupSucceeded {
            request,
            candidates,
        });
    }

    pub fn respond_latest(&mut self, candidates: Vec<Candidate>) {
        let request = self.lookups.last().map(|(id, _)| *id).expect("a lookup was issued");
        self.respond(request, candidates);
    }

    /// Types `text`, lets the debounce window elapse and answers the lookup.
    pub fn search(&mut self, text: &str, candidates: Vec<Candidate>) {
        self.type_text(text);
        self.advance(self.controller.settings().debounce);
        self.respond_latest(candidates);
    }

    pub fn lookup_queries(&self) -> Vec<&str> {
        self.lookups.iter().map(|(_, q)| q.as_str()).collect()
    }

    pub fn view(&self) -> WidgetView {
        self.controller.view()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}
