//! Query records
//!
//! A record describes one SPARQL query instance of the dataset: which
//! template it instantiates, the placeholder → URI mapping that filled it,
//! and what the query answered. Fields the verbalizer does not interpret are
//! carried through untouched in [`QueryRecord::extra`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Answer count as found in the corpus
///
/// Plain queries store a single number. Count templates store one number per
/// projected answer variable (e.g. `{"callret-0": 1}`). Shape and key order
/// are kept as read so downstream consumers see what they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerCount {
    Scalar(i64),
    PerVariable(IndexMap<String, i64>),
}

impl AnswerCount {
    /// Count used for plurality decisions.
    ///
    /// Per-variable counts use the largest variable; an empty map counts as 0.
    pub fn count(&self) -> i64 {
        match self {
            AnswerCount::Scalar(n) => *n,
            AnswerCount::PerVariable(counts) => counts.values().copied().max().unwrap_or(0),
        }
    }
}

impl Default for AnswerCount {
    fn default() -> Self {
        AnswerCount::Scalar(0)
    }
}

impl From<i64> for AnswerCount {
    fn from(n: i64) -> Self {
        AnswerCount::Scalar(n)
    }
}

/// One SPARQL query instance, before and after verbalization
///
/// Maps keep corpus key order on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Catalog key selecting the question templates
    pub template_id: u32,

    /// Placeholder name → entity/relation URI
    pub mapping: IndexMap<String, String>,

    /// Placeholder name → ontology type URI
    #[serde(default)]
    pub mapping_type: IndexMap<String, String>,

    #[serde(default)]
    pub answer_num: AnswerCount,

    /// Ontology types of the answer, kept in corpus order
    #[serde(default)]
    pub answer_type: Vec<String>,

    #[serde(default)]
    pub answer: IndexMap<String, Vec<String>>,

    /// Instantiated SPARQL text
    #[serde(default)]
    pub query: String,

    /// Placeholder name → surface form, set by verbalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_sf: Option<IndexMap<String, String>>,

    /// Raw template string the question was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_verbalized: Option<String>,

    /// Any other corpus fields (`_id`, `template`, `n_entities`, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl QueryRecord {
    /// Minimal record, mostly useful for tests and ad-hoc tooling
    pub fn new(template_id: u32) -> Self {
        Self {
            template_id,
            mapping: IndexMap::new(),
            mapping_type: IndexMap::new(),
            answer_num: AnswerCount::default(),
            answer_type: Vec::new(),
            answer: IndexMap::new(),
            query: String::new(),
            mapping_sf: None,
            question_template: None,
            question_verbalized: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_mapping(mut self, name: impl Into<String>, uri: impl Into<String>) -> Self {
        self.mapping.insert(name.into(), uri.into());
        self
    }

    pub fn with_answer_num(mut self, answer_num: impl Into<AnswerCount>) -> Self {
        self.answer_num = answer_num.into();
        self
    }

    pub fn with_answer_type(mut self, type_uri: impl Into<String>) -> Self {
        self.answer_type.push(type_uri.into());
        self
    }

    pub fn has_answer_type(&self, type_uri: &str) -> bool {
        self.answer_type.iter().any(|t| t == type_uri)
    }

    /// Whether the record has been through verbalization
    pub fn is_verbalized(&self) -> bool {
        self.question_verbalized.is_some()
    }
}
