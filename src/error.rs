//! Error types for the verbalizer
//!
//! One enum per concern, composed into [`VerbalizeError`] for callers of
//! [`crate::Verbalizer::verbalize`]. Nothing here is retried internally.

use thiserror::Error;

/// Errors surfaced while verbalizing a single query record
#[derive(Error, Debug)]
pub enum VerbalizeError {
    /// The record names a template identifier the catalog does not know
    #[error("Template {template_id} not found in catalog")]
    NotFound { template_id: u32 },

    #[error("Catalog configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Label resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// The chosen template references a name absent from the surface forms
    #[error("Template '{template}' references unknown placeholder '{name}'")]
    MissingPlaceholder { name: String, template: String },

    #[error("Template '{template}' contains malformed placeholder '{placeholder}'")]
    MalformedPlaceholder {
        placeholder: String,
        template: String,
    },
}

/// Authoring mistakes in a template catalog
///
/// These indicate a data bug in the catalog, not a bad record; batch callers
/// should abort rather than skip.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Template {template_id}: node at '{path}' has no 'vanilla' branch")]
    MissingVanilla { template_id: u32, path: String },

    #[error("Template {template_id}: node at '{path}' has several conditions: {conditions:?}")]
    MultipleConditions {
        template_id: u32,
        path: String,
        conditions: Vec<String>,
    },

    #[error("Template {template_id}: unknown condition '{condition}' at '{path}'")]
    UnknownCondition {
        template_id: u32,
        path: String,
        condition: String,
    },

    #[error("Template {template_id}: empty template list at '{path}'")]
    EmptyLeaf { template_id: u32, path: String },

    /// Only `%(name)s` slots with `[A-Za-z0-9_]` names are supported
    #[error("Template {template_id}: malformed placeholder '{placeholder}' in '{template}'")]
    MalformedPlaceholder {
        template_id: u32,
        template: String,
        placeholder: String,
    },

    #[error("Template {template_id} registered twice")]
    DuplicateTemplate { template_id: u32 },

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures of the label lookup collaborator
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("No label found for '{uri}'")]
    LabelNotFound { uri: String },

    #[error("Cannot derive a label from '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Label request for '{uri}' failed: {source}")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected label response for '{uri}': {message}")]
    BadResponse { uri: String, message: String },
}

/// Invalid runtime settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load template catalog: {0}")]
    Catalog(#[from] ConfigurationError),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VerbalizeError>;
