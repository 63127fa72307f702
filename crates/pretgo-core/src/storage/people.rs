use rusqlite::{Connection, Row, params};

use crate::error::Result;
use crate::models::{Candidate, CandidateId, fallback_category_label};

/// Maximum rows returned for a non-empty search.
pub const SEARCH_LIMIT: usize = 20;

const SELECT_ACTIVE: &str = "
    SELECT p.id, p.nom, p.prenom, p.categorie, p.classe, c.libelle
    FROM personnes p
    LEFT JOIN categories_personnes c ON c.cle = p.categorie AND c.actif = 1
    WHERE p.actif = 1";

/// Person search over the `personnes` table.
pub struct PeopleQuery<'a> {
    conn: &'a Connection,
}

impl<'a> PeopleQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Active people whose name, first name or class contains `text`.
    /// Blank text lists every active person.
    pub fn search(&self, text: &str) -> Result<Vec<Candidate>> {
        let text = text.trim();
        if text.is_empty() {
            let sql = format!("{SELECT_ACTIVE} ORDER BY p.nom, p.prenom");
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_candidate)?;
            return Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?);
        }

        let sql = format!(
            "{SELECT_ACTIVE} AND (p.nom LIKE ?1 OR p.prenom LIKE ?1 OR p.classe LIKE ?1)
             ORDER BY p.nom, p.prenom
             LIMIT ?2"
        );
        let pattern = format!("%{text}%");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, SEARCH_LIMIT as i64], row_to_candidate)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn row_to_candidate(row: &Row<'_>) -> rusqlite::Result<Candidate> {
    let id: i64 = row.get(0)?;
    let categorie: Option<String> = row.get(3)?;
    let libelle: Option<String> = row.get(5)?;
    let categorie_label = match (&libelle, &categorie) {
        (Some(label), _) => Some(label.clone()),
        (None, Some(code)) => Some(fallback_category_label(code)),
        (None, None) => None,
    };

    Ok(Candidate {
        id: CandidateId::from(id),
        nom: row.get(1)?,
        prenom: row.get(2)?,
        categorie,
        categorie_label,
        classe: row.get(4)?,
    })
}
