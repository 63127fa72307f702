use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use pretgo_core::page::Level;
use pretgo_core::{ListView, SelectionPanel};

use crate::app::PickerApp;

const FOOTER_HINTS: &str = " ↑/↓ choisir  Entrée valider  Échap fermer  Ctrl-R changer  \
     Ctrl-N créer  Ctrl-D masquer l'alerte  Ctrl-C quitter ";

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &PickerApp) {
    let size = frame.area();
    let banner_lines = app.banners.visible().len().min(3) as u16;

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // header
            Constraint::Length(3),            // input or panel
            Constraint::Min(3),               // results
            Constraint::Length(banner_lines), // banners
            Constraint::Length(1),            // key hints
        ])
        .split(size);

    render_header(frame, app, main_layout[0]);
    match &app.view.panel {
        Some(panel) => render_panel(frame, app, panel, main_layout[1]),
        None => render_input(frame, app, main_layout[1]),
    }
    render_results(frame, app, main_layout[2]);
    render_banners(frame, app, main_layout[3]);

    let footer_style = Style::default().fg(app.theme.muted()).bg(app.theme.bg());
    frame.render_widget(Paragraph::new(FOOTER_HINTS).style(footer_style), main_layout[4]);
}

// ─── Header ────────────────────────────────────────────────

fn render_header(frame: &mut Frame, app: &PickerApp, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " pretgo ",
        Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
    )];
    for link in &app.nav {
        let style = if link.active {
            Style::default().fg(theme.fg_bright()).bg(theme.active()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg())
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", link.label), style));
    }

    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let clock_width = app.clock_text.chars().count() + 1;
    let pad = (area.width as usize).saturating_sub(used + clock_width);
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(format!("{} ", app.clock_text), Style::default().fg(theme.fg())));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_secondary())),
        area,
    );
}

// ─── Widget ────────────────────────────────────────────────

fn render_input(frame: &mut Frame, app: &PickerApp, area: Rect) {
    let theme = &app.theme;
    let border = if app.view.input_focused {
        theme.accent()
    } else {
        theme.muted()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Emprunteur ")
        .border_style(Style::default().fg(border));

    let text = if app.input.is_empty() {
        Line::from(Span::styled(
            "Rechercher par nom, prénom ou classe…",
            Style::default().fg(theme.muted()),
        ))
    } else {
        Line::from(Span::styled(app.input.as_str(), Style::default().fg(theme.fg_bright())))
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if app.view.input_focused {
        frame.set_cursor_position(cursor_position(area, &app.input));
    }
}

/// Cursor after the last typed char, clamped inside the input border.
fn cursor_position(area: Rect, input: &str) -> (u16, u16) {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(1).saturating_add(typed);
    (x.min(area.right().saturating_sub(2)), area.y.saturating_add(1))
}

fn render_panel(frame: &mut Frame, app: &PickerApp, panel: &SelectionPanel, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Emprunteur sélectionné ")
        .border_style(Style::default().fg(theme.success()));

    let mut spans = vec![
        Span::styled("✔ ", Style::default().fg(theme.success())),
        Span::styled(
            panel.label.as_str(),
            Style::default().fg(theme.fg_bright()).add_modifier(Modifier::BOLD),
        ),
    ];
    if !panel.detail.is_empty() {
        spans.push(Span::styled(format!("  {}", panel.detail), Style::default().fg(theme.fg())));
    }
    spans.push(Span::styled(
        format!("  #{}", panel.candidate_id),
        Style::default().fg(theme.muted()),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_results(frame: &mut Frame, app: &PickerApp, area: Rect) {
    let theme = &app.theme;
    match &app.view.list {
        ListView::Hidden => {}
        ListView::Candidates {
            entries,
            highlighted,
        } => {
            let items: Vec<ListItem> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let active = *highlighted == Some(i);
                    let marker = if active { "▸ " } else { "  " };
                    let base = if active {
                        Style::default().bg(theme.active()).fg(theme.fg_bright())
                    } else {
                        Style::default().fg(theme.fg())
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, base),
                        Span::styled(entry.label.as_str(), base.add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  {}", entry.detail), base.fg(theme.muted())),
                    ]))
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.muted()));
            frame.render_widget(List::new(items).block(block), area);
        }
        ListView::NoResults { query, create_href } => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Aucun résultat pour « {query} »"),
                    Style::default().fg(theme.warning()),
                )),
                Line::from(vec![
                    Span::styled(
                        "Ctrl-N ",
                        Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("Créer une nouvelle personne ({create_href})"),
                        Style::default().fg(theme.fg()),
                    ),
                ]),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.muted()));
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

// ─── Banners ───────────────────────────────────────────────

fn render_banners(frame: &mut Frame, app: &PickerApp, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let lines: Vec<Line> = app
        .banners
        .visible()
        .iter()
        .rev()
        .take(area.height as usize)
        .map(|banner| {
            let color = match banner.level {
                Level::Success => theme.success(),
                Level::Info => theme.accent(),
                Level::Warning => theme.warning(),
                Level::Danger => theme.danger(),
            };
            Line::from(Span::styled(format!(" {}", banner.message), Style::default().fg(color)))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use pretgo_core::{AppConfig, Candidate, Lookup, LookupError, Query};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    struct OneLookup;

    #[async_trait]
    impl Lookup for OneLookup {
        fn name(&self) -> &str {
            "one"
        }

        async fn search(&self, _query: &Query) -> Result<Vec<Candidate>, LookupError> {
            Ok(vec![
                Candidate::new("42", "Dupont", "Marie")
                    .with_category("eleve", "Élève")
                    .with_classe("3B"),
            ])
        }
    }

    fn screen(app: &PickerApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 14)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_screen_shows_nav_results_and_panel() {
        let mut app = PickerApp::new(&AppConfig::default(), Arc::new(OneLookup)).unwrap();
        let text = screen(&app);
        assert!(text.contains("Nouveau prêt"));
        assert!(text.contains("Rechercher par nom"));

        app.type_char('D').unwrap();
        sleep_and_tick(&mut app).await;
        let text = screen(&app);
        assert!(text.contains("Dupont Marie"));
        assert!(text.contains("Élève — 3B"));

        app.session.activate(0).unwrap();
        sleep_and_tick(&mut app).await;
        let text = screen(&app);
        assert!(text.contains("Emprunteur sélectionné"));
        assert!(text.contains("#42"));
        assert!(!text.contains("Rechercher par nom"));
    }

    #[test]
    fn test_cursor_stays_inside_input_on_long_text() {
        let area = Rect::new(0, 1, 40, 3);
        assert_eq!(cursor_position(area, "Dup"), (4, 2));

        let long = "x".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(cursor_position(area, &long), (38, 2));
        assert_eq!(cursor_position(Rect::new(u16::MAX - 5, 0, 5, 3), &long).0, u16::MAX - 2);
    }

    async fn sleep_and_tick(app: &mut PickerApp) {
        tokio::time::sleep(Duration::from_millis(300)).await;
        app.tick(Instant::now());
    }
}
