use askama::Template;

use super::view::{EntryView, ListView, SelectionPanel};
use crate::error::Result;

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<ul class="autocomplete-results" role="listbox">
{%- for row in rows %}
  <li class="autocomplete-item{% if row.active %} active{% endif %}" role="option" data-id="{{ row.entry.id }}">
    <span class="autocomplete-label">{{ row.entry.label }}</span>
    <small class="autocomplete-detail">{{ row.entry.detail }}</small>
  </li>
{%- endfor %}
</ul>"#
)]
struct CandidateListTemplate<'a> {
    rows: Vec<Row<'a>>,
}

struct Row<'a> {
    entry: &'a EntryView,
    active: bool,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<ul class="autocomplete-results" role="listbox">
  <li class="autocomplete-empty">
    <span>Aucun résultat pour « {{ query }} »</span>
    <a class="autocomplete-create" href="{{ create_href }}">Créer une nouvelle personne</a>
  </li>
</ul>"#
)]
struct NoResultsTemplate<'a> {
    query: &'a str,
    create_href: &'a str,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<div class="selection-panel" data-id="{{ candidate_id }}">
  <strong class="selection-label">{{ label }}</strong>
  <small class="selection-detail">{{ detail }}</small>
  <button type="button" class="selection-reset">Changer</button>
</div>"#
)]
struct SelectionPanelTemplate<'a> {
    candidate_id: &'a str,
    label: &'a str,
    detail: &'a str,
}

/// Renders the result list. `Hidden` renders as an empty string.
pub fn render_list_html(list: &ListView) -> Result<String> {
    let html = match list {
        ListView::Hidden => String::new(),
        ListView::Candidates {
            entries,
            highlighted,
        } => CandidateListTemplate {
            rows: entries
                .iter()
                .enumerate()
                .map(|(i, entry)| Row {
                    entry,
                    active: *highlighted == Some(i),
                })
                .collect(),
        }
        .render()?,
        ListView::NoResults { query, create_href } => NoResultsTemplate {
            query,
            create_href,
        }
        .render()?,
    };
    Ok(html)
}

pub fn render_panel_html(panel: &SelectionPanel) -> Result<String> {
    Ok(SelectionPanelTemplate {
        candidate_id: &panel.candidate_id,
        label: &panel.label,
        detail: &panel.detail,
    }
    .render()?)
}
