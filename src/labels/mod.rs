//! Label resolution
//!
//! Turns entity/relation URIs into the human-readable surface forms that
//! fill question templates.
//!
//! - [`LocalNameResolver`] - offline, derives labels from the URI itself
//! - [`SparqlLabelResolver`] - `rdfs:label` lookup against a SPARQL endpoint
//! - [`LabelCache`] - thread-safe memoizing wrapper around either

mod cache;
mod local_name;
mod sparql;

use std::sync::Arc;

use indexmap::IndexMap;

pub use cache::LabelCache;
pub use local_name::LocalNameResolver;
pub use sparql::{SparqlLabelResolver, DBPEDIA_SPARQL_ENDPOINT};

use crate::error::ResolutionError;

/// Mapping key holding the plain question word
pub const PREFIX_KEY: &str = "prefix";
/// Surface-form key holding the possessive question word
pub const PREFIX_POSSESSIVE_KEY: &str = "prefix_possessive";

/// Maps an opaque identifier to a display string
pub trait LabelResolver: Send + Sync {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError>;
}

impl<R: LabelResolver + ?Sized> LabelResolver for Arc<R> {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
        (**self).resolve(uri)
    }
}

impl<R: LabelResolver + ?Sized> LabelResolver for Box<R> {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
        (**self).resolve(uri)
    }
}

/// Whether a mapping key is a synthetic question-word entry rather than a URI
pub fn is_synthetic_key(name: &str) -> bool {
    name == PREFIX_KEY || name == PREFIX_POSSESSIVE_KEY
}

/// Resolve every URI of `mapping` to its surface form.
///
/// Synthetic prefix entries are copied as-is and key order is kept. The
/// first failing lookup aborts the whole mapping.
pub fn surface_forms<R: LabelResolver + ?Sized>(
    resolver: &R,
    mapping: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>, ResolutionError> {
    mapping
        .iter()
        .map(|(name, value)| {
            if is_synthetic_key(name) {
                return Ok((name.clone(), value.clone()));
            }
            resolver
                .resolve(value)
                .map(|label| (name.clone(), label))
                .map_err(|e| {
                    tracing::warn!(placeholder = %name, uri = %value, error = %e, "label resolution failed");
                    e
                })
        })
        .collect()
}
