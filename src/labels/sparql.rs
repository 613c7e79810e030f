//! SPARQL endpoint label lookup
//!
//! Blocking HTTP client fetching `rdfs:label` for a URI in one language.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::LabelResolver;
use crate::error::ResolutionError;

pub const DBPEDIA_SPARQL_ENDPOINT: &str = "https://dbpedia.org/sparql";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// SPARQL 1.1 JSON results, only the parts we read
#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

pub struct SparqlLabelResolver {
    client: Client,
    endpoint: String,
    language: String,
}

impl SparqlLabelResolver {
    pub fn new(
        endpoint: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            language: language.into(),
        })
    }

    /// English labels from the public DBpedia endpoint
    pub fn dbpedia() -> Result<Self, reqwest::Error> {
        Self::new(DBPEDIA_SPARQL_ENDPOINT, "en")
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn label_query(&self, uri: &str) -> String {
        format!(
            "SELECT ?label WHERE {{ <{}> <http://www.w3.org/2000/01/rdf-schema#label> ?label . \
             FILTER (langMatches(lang(?label), \"{}\")) }} LIMIT 1",
            uri, self.language
        )
    }
}

/// Characters that would let a URI escape its `<...>` in the query
fn is_safe_iri(uri: &str) -> bool {
    !uri.is_empty()
        && !uri.chars().any(|c| {
            c.is_whitespace()
                || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
        })
}

impl LabelResolver for SparqlLabelResolver {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
        if !is_safe_iri(uri) {
            return Err(ResolutionError::InvalidUri {
                uri: uri.to_string(),
                reason: "not a valid IRI reference".to_string(),
            });
        }

        let query = self.label_query(uri);
        let http_err = |source| ResolutionError::Http {
            uri: uri.to_string(),
            source,
        };

        let response: SparqlResults = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("query", query.as_str()),
                ("format", "application/sparql-results+json"),
            ])
            .send()
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json()
            .map_err(|e| ResolutionError::BadResponse {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        response
            .results
            .bindings
            .into_iter()
            .find_map(|mut row| row.remove("label"))
            .map(|term| term.value)
            .ok_or_else(|| ResolutionError::LabelNotFound {
                uri: uri.to_string(),
            })
    }
}
