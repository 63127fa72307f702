pub mod app;
pub mod event;
pub mod keys;
pub mod theme;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use pretgo_core::Selection;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use app::PickerApp;
use event::{AppEvent, EventHandler};

/// Run the picker until the user confirms, quits or cancels.
///
/// Blocks the calling thread; the session itself runs on the tokio runtime
/// the app was created on.
pub fn run_picker(app: &mut PickerApp) -> Result<Option<Selection>> {
    // Install panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = std::io::stdout().execute(crossterm::terminal::LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(Duration::from_millis(50));
    let outcome = event_loop(&mut terminal, &event_handler, app);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    outcome
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    event_handler: &EventHandler,
    app: &mut PickerApp,
) -> Result<Option<Selection>> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => keys::handle_key(app, key.code, key.modifiers)?,
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(app.outcome());
        }
    }
}
