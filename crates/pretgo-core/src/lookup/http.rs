use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{Lookup, LookupError};
use crate::config::AppConfig;
use crate::models::{Candidate, Query};

/// Queries the running loan application's JSON search endpoint.
pub struct HttpLookup {
    client: reqwest::Client,
    endpoint: String,
    query_param: String,
}

impl HttpLookup {
    pub fn new(
        base_url: &str,
        search_path: &str,
        query_param: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pretgo/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), search_path),
            query_param: query_param.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        Self::new(
            &config.lookup.base_url,
            &config.lookup.search_path,
            &config.lookup.query_param,
            config.lookup_timeout(),
        )
    }

    pub fn url_for(&self, query: &Query) -> String {
        format!(
            "{}?{}={}",
            self.endpoint,
            self.query_param,
            urlencoding::encode(query.as_str())
        )
    }
}

#[async_trait]
impl Lookup for HttpLookup {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &Query) -> Result<Vec<Candidate>, LookupError> {
        let url = self.url_for(query);
        debug!(%url, "GET person search");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(LookupError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| LookupError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn lookup(base_url: &str) -> HttpLookup {
        HttpLookup::new(base_url, "/api/personnes", "q", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_query_is_url_encoded() {
        let l = lookup("http://localhost:5000/");
        assert_eq!(
            l.url_for(&Query::parse("Élo d'Or")),
            "http://localhost:5000/api/personnes?q=%C3%89lo%20d%27Or"
        );
    }

    #[test]
    fn test_from_config_uses_lookup_section() {
        let mut cfg = AppConfig::default();
        cfg.lookup.base_url = "https://prets.example/".to_string();
        cfg.lookup.search_path = "/api/v2/personnes".to_string();
        cfg.lookup.query_param = "term".to_string();
        cfg.lookup.timeout_ms = 750;
        assert_eq!(cfg.lookup_timeout(), Duration::from_millis(750));

        let l = HttpLookup::from_config(&cfg).unwrap();
        assert_eq!(
            l.url_for(&Query::parse("Dupont")),
            "https://prets.example/api/v2/personnes?term=Dupont"
        );
    }

    #[tokio::test]
    async fn test_search_parses_candidates() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/personnes")
            .match_query(Matcher::UrlEncoded("q".into(), "Dupont".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 42, "nom": "Dupont", "prenom": "Marie", "categorie": "eleve",
                     "categorie_label": "Élève", "classe": "3B"},
                    {"id": 43, "nom": "Dupont", "prenom": "Paul", "categorie": "enseignant",
                     "categorie_label": "Enseignant", "classe": ""}
                ]"#,
            )
            .create_async()
            .await;

        let found = lookup(&server.url()).search(&Query::parse("Dupont")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id.as_str(), "42");
        assert_eq!(found[0].detail_text(), "Élève — 3B");
        assert_eq!(found[1].detail_text(), "Enseignant");
    }

    #[tokio::test]
    async fn test_empty_array_is_not_an_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/personnes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let found = lookup(&server.url()).search(&Query::parse("Zorglub")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/personnes")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = lookup(&server.url()).search(&Query::parse("Du")).await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_parse() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/personnes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let err = lookup(&server.url()).search(&Query::parse("Du")).await.unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }
}
