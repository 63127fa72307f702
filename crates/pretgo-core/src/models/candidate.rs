use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque person identifier.
///
/// The loan application emits integer ids; other hosts may send strings.
/// Both deserialize to the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for CandidateId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// One lookup result representing a person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub nom: String,
    pub prenom: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classe: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, nom: impl Into<String>, prenom: impl Into<String>) -> Self {
        Self {
            id: CandidateId::new(id),
            nom: nom.into(),
            prenom: prenom.into(),
            categorie: None,
            categorie_label: None,
            classe: None,
        }
    }

    pub fn with_category(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.categorie = Some(code.into());
        self.categorie_label = Some(label.into());
        self
    }

    pub fn with_classe(mut self, classe: impl Into<String>) -> Self {
        self.classe = Some(classe.into());
        self
    }

    /// `nom` + space + `prenom`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nom, self.prenom)
    }

    /// The label is preferred over the raw code; empty when neither is set.
    pub fn category_text(&self) -> &str {
        self.categorie_label
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.categorie.as_deref())
            .unwrap_or("")
    }

    /// Category text and class, skipping empty parts, joined by an em dash.
    pub fn detail_text(&self) -> String {
        let classe = self.classe.as_deref().unwrap_or("").trim();
        [self.category_text(), classe]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" — ")
    }
}

/// Display label for a category code that has no registered label:
/// underscores become spaces, a letter following any non-letter is
/// uppercased and every other letter lowercased.
pub fn fallback_category_label(code: &str) -> String {
    let mut label = String::with_capacity(code.len());
    let mut after_letter = false;
    for c in code.chars() {
        let c = if c == '_' { ' ' } else { c };
        if after_letter {
            label.extend(c.to_lowercase());
        } else {
            label.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_string_ids_deserialize_alike() {
        let from_int: Candidate =
            serde_json::from_str(r#"{"id": 42, "nom": "Dupont", "prenom": "Marie"}"#).unwrap();
        let from_str: Candidate =
            serde_json::from_str(r#"{"id": "42", "nom": "Dupont", "prenom": "Marie"}"#).unwrap();
        assert_eq!(from_int.id, from_str.id);
        assert_eq!(from_int.id.as_str(), "42");
    }

    #[test]
    fn test_unknown_fields_and_nulls_are_tolerated() {
        let c: Candidate = serde_json::from_str(
            r#"{"id": 7, "nom": "Martin", "prenom": "Paul", "classe": null, "actif": 1}"#,
        )
        .unwrap();
        assert!(c.classe.is_none());
        assert_eq!(c.detail_text(), "");
    }

    #[test]
    fn test_detail_prefers_label_and_appends_class() {
        let c = Candidate::new("42", "Dupont", "Marie")
            .with_category("eleve", "Élève")
            .with_classe("3B");
        assert_eq!(c.display_name(), "Dupont Marie");
        assert_eq!(c.detail_text(), "Élève — 3B");
    }

    #[test]
    fn test_detail_falls_back_to_raw_code() {
        let mut c = Candidate::new("1", "Durand", "Luc");
        c.categorie = Some("agent".to_string());
        assert_eq!(c.category_text(), "agent");
        assert_eq!(c.detail_text(), "agent");

        c.classe = Some(String::new());
        assert_eq!(c.detail_text(), "agent");
    }

    #[test]
    fn test_detail_with_class_only() {
        let c = Candidate::new("2", "Petit", "Léa").with_classe("5A");
        assert_eq!(c.detail_text(), "5A");
    }

    #[test]
    fn test_fallback_category_label() {
        assert_eq!(fallback_category_label("non_enseignant"), "Non Enseignant");
        assert_eq!(fallback_category_label("eleve"), "Eleve");
        assert_eq!(fallback_category_label("3eme_annee"), "3Eme Annee");
        assert_eq!(fallback_category_label("AGENT_d'entretien"), "Agent D'Entretien");
        assert_eq!(fallback_category_label(""), "");
    }
}
