use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::handle::SessionHandle;
use crate::autocomplete::{AutocompleteController, Effect, Event, TimerToken, WidgetView};
use crate::lookup::Lookup;
use crate::models::{Query, Selection};

/// Effects the embedding page has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SelectionCommitted(Selection),
    SelectionCleared,
    FocusInput,
    OpenCreateForm { href: String },
}

/// A running widget: the command handle, the latest view and host events.
pub struct AutocompleteSession {
    pub handle: SessionHandle,
    pub view: watch::Receiver<WidgetView>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    pub task: JoinHandle<()>,
}

impl AutocompleteSession {
    /// Starts the session task. Must be called inside a tokio runtime.
    pub fn spawn(controller: AutocompleteController, lookup: Arc<dyn Lookup>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(controller.view());

        let runtime = Runtime {
            controller,
            lookup,
            internal_tx,
            timers: HashMap::new(),
            view_tx,
            events_tx,
        };
        let task = tokio::spawn(runtime.run(command_rx, internal_rx));

        Self {
            handle: SessionHandle::new(command_tx),
            view: view_rx,
            events: events_rx,
            task,
        }
    }
}

struct Runtime {
    controller: AutocompleteController,
    lookup: Arc<dyn Lookup>,
    /// Timer and lookup tasks post back through here.
    internal_tx: mpsc::UnboundedSender<Event>,
    timers: HashMap<TimerToken, JoinHandle<()>>,
    view_tx: watch::Sender<WidgetView>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Runtime {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Event>,
        mut internal: mpsc::UnboundedReceiver<Event>,
    ) {
        debug!(source = self.lookup.name(), "autocomplete session started");
        loop {
            let event = tokio::select! {
                command = commands.recv() => match command {
                    Some(event) => event,
                    None => break,
                },
                Some(event) = internal.recv() => event,
            };
            self.dispatch(event);
        }

        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        debug!("autocomplete session closed");
    }

    fn dispatch(&mut self, event: Event) {
        if let Event::TimerFired(token) = &event {
            self.timers.remove(token);
        }
        for effect in self.controller.handle(event) {
            self.apply(effect);
        }
        self.view_tx.send_replace(self.controller.view());
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleTimer { token, delay } => {
                let tx = self.internal_tx.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Event::TimerFired(token));
                });
                if let Some(previous) = self.timers.insert(token, timer) {
                    previous.abort();
                }
            }
            Effect::CancelTimer(token) => {
                if let Some(timer) = self.timers.remove(&token) {
                    timer.abort();
                }
            }
            Effect::Lookup { request, query } => {
                let lookup = Arc::clone(&self.lookup);
                let tx = self.internal_tx.clone();
                tokio::spawn(async move {
                    let event = match lookup.search(&Query::parse(&query)).await {
                        Ok(candidates) => Event::LookupSucceeded {
                            request,
                            candidates,
                        },
                        Err(e) => Event::LookupFailed {
                            request,
                            message: e.to_string(),
                        },
                    };
                    let _ = tx.send(event);
                });
            }
            Effect::SelectionCommitted(selection) => {
                self.emit(SessionEvent::SelectionCommitted(selection))
            }
            Effect::SelectionCleared => self.emit(SessionEvent::SelectionCleared),
            Effect::FocusInput => self.emit(SessionEvent::FocusInput),
            Effect::OpenCreateForm { href } => self.emit(SessionEvent::OpenCreateForm { href }),
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events_tx.send(event).is_err() {
            debug!("no listener for session events");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::*;
    use crate::autocomplete::{ControllerSettings, WidgetState};
    use crate::lookup::LookupError;
    use crate::models::Candidate;
    use crate::render::ListView;

    /// Scripted lookup: per-query delay and outcome, every call recorded.
    #[derive(Default)]
    struct ScriptedLookup {
        calls: Mutex<Vec<String>>,
        script: HashMap<String, (Duration, Option<Vec<Candidate>>)>,
    }

    impl ScriptedLookup {
        fn answer(mut self, query: &str, delay_ms: u64, candidates: Vec<Candidate>) -> Self {
            self.script
                .insert(query.to_string(), (Duration::from_millis(delay_ms), Some(candidates)));
            self
        }

        fn fail(mut self, query: &str) -> Self {
            self.script
                .insert(query.to_string(), (Duration::ZERO, None));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Lookup for ScriptedLookup {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, query: &Query) -> Result<Vec<Candidate>, LookupError> {
            self.calls.lock().unwrap().push(query.as_str().to_string());
            let (delay, outcome) = self
                .script
                .get(query.as_str())
                .cloned()
                .unwrap_or((Duration::ZERO, Some(Vec::new())));
            sleep(delay).await;
            outcome.ok_or_else(|| LookupError::Unavailable("connection refused".to_string()))
        }
    }

    fn marie() -> Candidate {
        Candidate::new("42", "Dupont", "Marie")
            .with_category("eleve", "Élève")
            .with_classe("3B")
    }

    fn paul() -> Candidate {
        Candidate::new("43", "Dupont", "Paul")
    }

    fn spawn(lookup: &Arc<ScriptedLookup>) -> AutocompleteSession {
        let lookup: Arc<dyn Lookup> = lookup.clone();
        let controller = AutocompleteController::new(ControllerSettings::default());
        AutocompleteSession::spawn(controller, lookup)
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_coalesce_into_one_lookup() {
        let lookup = Arc::new(ScriptedLookup::default().answer("Dupont", 0, vec![marie()]));
        let mut session = spawn(&lookup);

        for text in ["D", "Du", "Dup", "Dupo", "Dupont"] {
            session.handle.input(text).unwrap();
            sleep(Duration::from_millis(50)).await;
        }
        sleep(Duration::from_millis(300)).await;

        assert_eq!(lookup.calls(), vec!["Dupont"]);
        let view = session.view.borrow_and_update().clone();
        assert_eq!(view.state, WidgetState::ShowingResults);
        assert_eq!(view.list.entries()[0].label, "Dupont Marie");
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_and_reset_reach_the_host() {
        let lookup = Arc::new(ScriptedLookup::default().answer("Dupont", 20, vec![marie()]));
        let mut session = spawn(&lookup);
        let reset = session.handle.reset_handle();

        session.handle.input("Dupont").unwrap();
        session
            .view
            .wait_for(|v| v.list.is_visible())
            .await
            .unwrap();

        session.handle.activate_highlighted().unwrap();
        let event = session.events.recv().await.unwrap();
        assert!(matches!(
            event,
            SessionEvent::SelectionCommitted(ref s) if s.candidate_id.as_str() == "42"
        ));
        assert_eq!(session.view.borrow().hidden_field, "42");

        reset.reset().unwrap();
        assert_eq!(session.events.recv().await, Some(SessionEvent::SelectionCleared));
        assert_eq!(session.events.recv().await, Some(SessionEvent::FocusInput));
        let view = session.view.borrow().clone();
        assert_eq!(view.hidden_field, "");
        assert!(view.input_visible);
        assert!(view.input_focused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_is_discarded() {
        let lookup = Arc::new(
            ScriptedLookup::default()
                .answer("Du", 800, vec![paul(), marie()])
                .answer("Dupont M", 10, vec![marie()]),
        );
        let mut session = spawn(&lookup);

        session.handle.input("Du").unwrap();
        sleep(Duration::from_millis(250)).await;
        session.handle.input("Dupont M").unwrap();
        sleep(Duration::from_millis(250)).await;
        assert_eq!(session.view.borrow().list.entries().len(), 1);

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(lookup.calls(), vec!["Du", "Dupont M"]);
        let view = session.view.borrow_and_update().clone();
        assert_eq!(view.list.entries().len(), 1);
        assert_eq!(view.list.entries()[0].id, "42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_leaves_list_hidden() {
        let lookup = Arc::new(ScriptedLookup::default().fail("Du"));
        let mut session = spawn(&lookup);

        session.handle.input("Du").unwrap();
        sleep(Duration::from_millis(500)).await;

        assert_eq!(lookup.calls(), vec!["Du"]);
        assert_eq!(session.view.borrow().list, ListView::Hidden);
        assert!(session.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_shortcut_is_forwarded() {
        let lookup = Arc::new(ScriptedLookup::default());
        let mut session = spawn(&lookup);

        session.handle.input("Zorglub").unwrap();
        session
            .view
            .wait_for(|v| matches!(v.list, ListView::NoResults { .. }))
            .await
            .unwrap();
        session.handle.activate_create().unwrap();

        assert_eq!(
            session.events.recv().await,
            Some(SessionEvent::OpenCreateForm {
                href: "/personnes/ajouter".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_stops_when_handles_are_dropped() {
        let lookup = Arc::new(ScriptedLookup::default());
        let session = spawn(&lookup);
        let reset = session.handle.reset_handle();

        session.handle.input("Du").unwrap();
        drop(session.handle);
        drop(reset);

        session.task.await.unwrap();
        sleep(Duration::from_millis(500)).await;
        assert!(lookup.calls().is_empty());
    }
}
