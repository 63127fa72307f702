use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use pretgo_core::{Direction, ListView, PointerTarget};

use crate::app::PickerApp;

pub fn handle_key(app: &mut PickerApp, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') => app.quit(true),
            KeyCode::Char('r') => app.reset()?,
            KeyCode::Char('d') => {
                app.dismiss_banner();
            }
            KeyCode::Char('n') => {
                if matches!(app.view.list, ListView::NoResults { .. }) {
                    app.session.activate_create()?;
                }
            }
            _ => {}
        }
        return Ok(());
    }

    match code {
        KeyCode::Char(c) => app.type_char(c)?,
        KeyCode::Backspace => app.backspace()?,
        KeyCode::Up => app.session.move_highlight(Direction::Up)?,
        KeyCode::Down => app.session.move_highlight(Direction::Down)?,
        KeyCode::Enter => {
            if app.view.panel_visible() {
                app.quit(false);
            } else {
                app.session.activate_highlighted()?;
            }
        }
        KeyCode::Esc => {
            if app.view.list.is_visible() {
                app.session.pointer(PointerTarget::Outside)?;
            } else {
                app.quit(false);
            }
        }
        _ => {}
    }
    Ok(())
}
