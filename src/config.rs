//! Runtime settings
//!
//! Loaded from `VERBALIZER_*` environment variables (the CLI reads `.env`
//! first via dotenvy) or from a YAML file. Every field has a default, so an
//! empty environment yields a working offline configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::labels::DBPEDIA_SPARQL_ENDPOINT;
use crate::prefix::{DBPEDIA_AGENT, DBPEDIA_ORGANISATION};
use crate::selector::DEFAULT_PLURALITY_THRESHOLD;

/// Where surface forms come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// Local name of the URI, no network
    #[default]
    LocalName,
    /// `rdfs:label` from a SPARQL endpoint, cached per process
    Sparql,
}

impl FromStr for LabelSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "local_name" => Ok(LabelSource::LocalName),
            "sparql" => Ok(LabelSource::Sparql),
            other => Err(format!("expected 'local' or 'sparql', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbalizerConfig {
    /// Answer count from which plural templates are used
    pub plurality_threshold: i64,
    /// Seed for template choice; `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub agent_type: String,
    pub organisation_type: String,
    pub label_source: LabelSource,
    pub sparql_endpoint: String,
    pub label_language: String,
    /// YAML catalog replacing the built-in templates
    pub catalog_path: Option<PathBuf>,
}

impl Default for VerbalizerConfig {
    fn default() -> Self {
        Self {
            plurality_threshold: DEFAULT_PLURALITY_THRESHOLD,
            seed: None,
            agent_type: DBPEDIA_AGENT.to_string(),
            organisation_type: DBPEDIA_ORGANISATION.to_string(),
            label_source: LabelSource::default(),
            sparql_endpoint: DBPEDIA_SPARQL_ENDPOINT.to_string(),
            label_language: "en".to_string(),
            catalog_path: None,
        }
    }
}

pub const ENV_PLURAL_THRESHOLD: &str = "VERBALIZER_PLURAL_THRESHOLD";
pub const ENV_SEED: &str = "VERBALIZER_SEED";
pub const ENV_AGENT_TYPE: &str = "VERBALIZER_AGENT_TYPE";
pub const ENV_ORGANISATION_TYPE: &str = "VERBALIZER_ORGANISATION_TYPE";
pub const ENV_LABELS: &str = "VERBALIZER_LABELS";
pub const ENV_SPARQL_ENDPOINT: &str = "VERBALIZER_SPARQL_ENDPOINT";
pub const ENV_LABEL_LANGUAGE: &str = "VERBALIZER_LABEL_LANGUAGE";
pub const ENV_CATALOG: &str = "VERBALIZER_CATALOG";

impl VerbalizerConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup (env, test maps, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_PLURAL_THRESHOLD) {
            config.plurality_threshold = parse_value(ENV_PLURAL_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            config.seed = Some(parse_value(ENV_SEED, &v)?);
        }
        if let Some(v) = lookup(ENV_AGENT_TYPE) {
            config.agent_type = v;
        }
        if let Some(v) = lookup(ENV_ORGANISATION_TYPE) {
            config.organisation_type = v;
        }
        if let Some(v) = lookup(ENV_LABELS) {
            config.label_source = parse_value(ENV_LABELS, &v)?;
        }
        if let Some(v) = lookup(ENV_SPARQL_ENDPOINT) {
            config.sparql_endpoint = v;
        }
        if let Some(v) = lookup(ENV_LABEL_LANGUAGE) {
            config.label_language = v;
        }
        if let Some(v) = lookup(ENV_CATALOG) {
            config.catalog_path = Some(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plurality_threshold < 1 {
            return Err(ConfigError::InvalidValue {
                key: "plurality_threshold".to_string(),
                value: self.plurality_threshold.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.label_source == LabelSource::Sparql && self.sparql_endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sparql_endpoint".to_string(),
                value: self.sparql_endpoint.clone(),
                reason: "required when label_source is sparql".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
