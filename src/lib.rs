//! SPARQL Question Verbalizer
//!
//! Generates natural-language questions from SPARQL query records for a
//! question-answering dataset.
//!
//! Key concepts:
//! - Each record names a template id; the catalog holds a small decision
//!   tree of question templates per id
//! - Branches test grammatical conditions (currently: plural answers)
//! - Placeholders (`%(e_out)s`) are filled with labels, not raw URIs
//! - Template choice uses an injected RNG, so seeded runs are reproducible
//!
//! # Example
//!
//! ```
//! use sparql_verbalizer::{QueryRecord, Verbalizer};
//!
//! let mut record = QueryRecord::new(2)
//!     .with_mapping("e_in_to_e", "http://dbpedia.org/ontology/sport")
//!     .with_mapping("e_in", "http://dbpedia.org/resource/Polytechnic_University_of_the_Philippines")
//!     .with_answer_num(13);
//!
//! let mut verbalizer = Verbalizer::builder().seed(7).build();
//! verbalizer.verbalize(&mut record).unwrap();
//!
//! assert_eq!(
//!     record.question_verbalized.as_deref(),
//!     Some("What are the <sports> of <Polytechnic University of the Philippines>?")
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod labels;
pub mod pluralize;
pub mod prefix;
pub mod record;
pub mod selector;
pub mod verbalizer;

pub use catalog::{ConditionKind, TemplateCatalog, TemplateNode};
pub use config::{LabelSource, VerbalizerConfig};
pub use error::{ConfigError, ConfigurationError, ResolutionError, VerbalizeError};
pub use labels::{LabelCache, LabelResolver, LocalNameResolver, SparqlLabelResolver};
pub use pluralize::{EnglishPluralizer, Pluralizer};
pub use prefix::{AgentPrefixClassifier, PrefixClassifier, PrefixWord};
pub use record::{AnswerCount, QueryRecord};
pub use selector::{SelectionFlags, TemplateSelector};
pub use verbalizer::{Verbalizer, VerbalizerBuilder};
