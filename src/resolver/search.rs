//! Knowledge-base search port and Wikidata SPARQL client
//!
//! The Wikidata client runs the MediaWiki `EntitySearch` API through the query
//! service's federated `wikibase:mwapi` service and keeps the single best hit.

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// IRI prefix of Wikidata items in SPARQL results
pub const WIKIDATA_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

/// Port for "find the single best-matching entity for this text"
#[async_trait]
pub trait EntitySearch: Send + Sync {
    /// Best-matching identifier, `Ok(None)` when the search matched nothing.
    ///
    /// `Err` means the query itself failed and may be retried.
    async fn search(&self, text: &str) -> Result<Option<String>, SearchError>;
}

/// SPARQL client for the Wikidata Query Service
pub struct WikidataSearch {
    http: Client,
    endpoint: String,
    language: String,
}

impl WikidataSearch {
    /// Wikidata rejects requests without a descriptive User-Agent.
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            language: "en".to_string(),
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn build_query(&self, text: &str) -> String {
        build_entity_search_query(text, &self.language)
    }
}

#[async_trait]
impl EntitySearch for WikidataSearch {
    async fn search(&self, text: &str) -> Result<Option<String>, SearchError> {
        let query = self.build_query(text);
        tracing::debug!(mention = %text, "Querying {}", self.endpoint);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .header("Accept", "application/sparql-results+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        parse_first_item(&body)
    }
}

/// Federated EntitySearch query returning at most one item
pub fn build_entity_search_query(text: &str, language: &str) -> String {
    format!(
        r#"SELECT ?item WHERE {{
  SERVICE wikibase:mwapi {{
    bd:serviceParam wikibase:endpoint "www.wikidata.org";
                    wikibase:api "EntitySearch";
                    mwapi:search "{search}";
                    mwapi:language "{language}".
    ?item wikibase:apiOutputItem mwapi:item.
  }}
}}
LIMIT 1"#,
        search = escape_sparql_literal(text),
        language = escape_sparql_literal(language),
    )
}

/// Escape a string for use inside a double-quoted SPARQL literal
pub fn escape_sparql_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

/// Identifier of the first `?item` binding, if any
pub fn parse_first_item(body: &str) -> Result<Option<String>, SearchError> {
    let response: SparqlResponse = serde_json::from_str(body)?;

    let item = match response
        .results
        .bindings
        .into_iter()
        .find_map(|mut binding| binding.remove("item"))
    {
        Some(term) => term.value,
        None => return Ok(None),
    };

    match item.strip_prefix(WIKIDATA_ENTITY_PREFIX) {
        Some(id) if !id.is_empty() => Ok(Some(id.to_string())),
        _ => Err(SearchError::Other(format!(
            "Unexpected item IRI in search result: {}",
            item
        ))),
    }
}
