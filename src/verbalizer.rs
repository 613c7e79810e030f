//! Verbalizer
//!
//! Turns one query record into a natural-language question:
//!
//! ```text
//! QueryRecord
//!     │
//!     ├─► catalog.get(template_id)            (NotFound)
//!     ├─► selector.select(..) → candidates     (records SelectionFlags)
//!     ├─► pick one candidate with the injected RNG
//!     ├─► classify prefix (Who / What)
//!     ├─► resolve surface forms               (ResolutionError)
//!     ├─► add `<name>_s` plurals if flagged
//!     └─► interpolate                          (MissingPlaceholder)
//! ```
//!
//! The record is only written once every step succeeded.

use std::sync::Arc;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::catalog::{ConditionKind, TemplateCatalog};
use crate::config::{LabelSource, VerbalizerConfig};
use crate::error::{ConfigError, ConfigurationError, Result};
use crate::interpolate::interpolate;
use crate::labels::{
    surface_forms, LabelCache, LabelResolver, LocalNameResolver, SparqlLabelResolver, PREFIX_KEY,
    PREFIX_POSSESSIVE_KEY,
};
use crate::pluralize::{EnglishPluralizer, Pluralizer};
use crate::prefix::{AgentPrefixClassifier, PrefixClassifier};
use crate::record::QueryRecord;
use crate::selector::{SelectionFlags, TemplateSelector, DEFAULT_PLURALITY_THRESHOLD};

/// Suffix marking the plural variant of a placeholder
pub const PLURAL_SUFFIX: &str = "_s";

pub struct Verbalizer<R = StdRng> {
    catalog: Arc<TemplateCatalog>,
    resolver: Arc<dyn LabelResolver>,
    pluralizer: Arc<dyn Pluralizer>,
    classifier: Arc<dyn PrefixClassifier>,
    selector: TemplateSelector,
    rng: R,
    flags: SelectionFlags,
}

impl Verbalizer<StdRng> {
    pub fn builder() -> VerbalizerBuilder {
        VerbalizerBuilder::default()
    }
}

impl<R: Rng> Verbalizer<R> {
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Conditions taken by the most recent call
    pub fn flags(&self) -> &SelectionFlags {
        &self.flags
    }

    /// Verbalize `record` in place.
    ///
    /// Sets `mapping.prefix`, `mapping_sf`, `question_template` and
    /// `question_verbalized`. On error the record is left as it was.
    pub fn verbalize(&mut self, record: &mut QueryRecord) -> Result<()> {
        self.flags.clear();

        let root = self.catalog.get(record.template_id)?;
        let candidates = self.selector.select(root, record, &mut self.flags);
        let template = candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| ConfigurationError::EmptyLeaf {
                template_id: record.template_id,
                path: String::new(),
            })?;
        tracing::debug!(
            template_id = record.template_id,
            candidates = candidates.len(),
            flags = ?self.flags,
            template = %template,
            "selected question template"
        );

        let prefix = self.classifier.classify(&record.answer_type);
        let mut mapping = record.mapping.clone();
        mapping.insert(PREFIX_KEY.to_string(), prefix.plain().to_string());

        let mut mapping_sf = surface_forms(&*self.resolver, &mapping)?;
        mapping_sf.insert(
            PREFIX_POSSESSIVE_KEY.to_string(),
            prefix.possessive().to_string(),
        );

        if self.flags.contains(ConditionKind::Plural) {
            add_plural_forms(&mut mapping_sf, &*self.pluralizer);
        }

        let question = interpolate(&template, &mapping_sf)?;

        record.mapping = mapping;
        record.mapping_sf = Some(mapping_sf);
        record.question_template = Some(template);
        record.question_verbalized = Some(question);
        Ok(())
    }

    /// Owned variant of [`Verbalizer::verbalize`]
    pub fn verbalized(&mut self, mut record: QueryRecord) -> Result<QueryRecord> {
        self.verbalize(&mut record)?;
        Ok(record)
    }
}

/// Add a `<name>_s` entry holding the plural of every existing entry
fn add_plural_forms<P: Pluralizer + ?Sized>(
    mapping_sf: &mut IndexMap<String, String>,
    pluralizer: &P,
) {
    let plurals: Vec<(String, String)> = mapping_sf
        .iter()
        .map(|(name, sf)| {
            (
                format!("{}{}", name, PLURAL_SUFFIX),
                pluralizer.pluralize(sf),
            )
        })
        .collect();
    mapping_sf.extend(plurals);
}

/// Assembles a [`Verbalizer`]; every collaborator has an offline default
pub struct VerbalizerBuilder {
    catalog: Option<Arc<TemplateCatalog>>,
    resolver: Option<Arc<dyn LabelResolver>>,
    pluralizer: Option<Arc<dyn Pluralizer>>,
    classifier: Option<Arc<dyn PrefixClassifier>>,
    plurality_threshold: i64,
    seed: Option<u64>,
}

impl Default for VerbalizerBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            resolver: None,
            pluralizer: None,
            classifier: None,
            plurality_threshold: DEFAULT_PLURALITY_THRESHOLD,
            seed: None,
        }
    }
}

impl VerbalizerBuilder {
    /// Builder wired from runtime settings
    pub fn from_config(config: &VerbalizerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let catalog = match &config.catalog_path {
            Some(path) => TemplateCatalog::from_yaml_file(path)?,
            None => TemplateCatalog::builtin(),
        };

        let resolver: Arc<dyn LabelResolver> = match config.label_source {
            LabelSource::LocalName => Arc::new(LocalNameResolver::new()),
            LabelSource::Sparql => Arc::new(LabelCache::new(SparqlLabelResolver::new(
                config.sparql_endpoint.clone(),
                config.label_language.clone(),
            )?)),
        };

        let mut builder = Self::default()
            .catalog(catalog)
            .shared_resolver(resolver)
            .classifier(AgentPrefixClassifier::new(
                config.agent_type.clone(),
                config.organisation_type.clone(),
            ))
            .plurality_threshold(config.plurality_threshold);
        builder.seed = config.seed;
        Ok(builder)
    }

    pub fn catalog(self, catalog: TemplateCatalog) -> Self {
        self.shared_catalog(Arc::new(catalog))
    }

    pub fn shared_catalog(mut self, catalog: Arc<TemplateCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn resolver(self, resolver: impl LabelResolver + 'static) -> Self {
        self.shared_resolver(Arc::new(resolver))
    }

    /// Use a resolver (e.g. a [`LabelCache`]) shared with other verbalizers
    pub fn shared_resolver(mut self, resolver: Arc<dyn LabelResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn pluralizer(mut self, pluralizer: impl Pluralizer + 'static) -> Self {
        self.pluralizer = Some(Arc::new(pluralizer));
        self
    }

    pub fn classifier(mut self, classifier: impl PrefixClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    pub fn plurality_threshold(mut self, threshold: i64) -> Self {
        self.plurality_threshold = threshold;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build with a seeded [`StdRng`], or OS entropy when no seed was set
    pub fn build(self) -> Verbalizer<StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(rng)
    }

    /// Build with a caller-supplied random source
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Verbalizer<R> {
        Verbalizer {
            catalog: self
                .catalog
                .unwrap_or_else(|| Arc::new(TemplateCatalog::builtin())),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(LocalNameResolver::new())),
            pluralizer: self
                .pluralizer
                .unwrap_or_else(|| Arc::new(EnglishPluralizer)),
            classifier: self
                .classifier
                .unwrap_or_else(|| Arc::new(AgentPrefixClassifier::default())),
            selector: TemplateSelector::new(self.plurality_threshold),
            rng,
            flags: SelectionFlags::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateNode;
    use crate::error::{ResolutionError, VerbalizeError};
    use crate::interpolate::has_placeholders;
    use crate::prefix::DBPEDIA_AGENT;

    /// Returns the URI unchanged
    struct Identity;

    impl LabelResolver for Identity {
        fn resolve(&self, uri: &str) -> std::result::Result<String, ResolutionError> {
            Ok(uri.to_string())
        }
    }

    struct Failing;

    impl LabelResolver for Failing {
        fn resolve(&self, uri: &str) -> std::result::Result<String, ResolutionError> {
            Err(ResolutionError::LabelNotFound {
                uri: uri.to_string(),
            })
        }
    }

    fn verbalizer(seed: u64) -> Verbalizer {
        Verbalizer::builder().resolver(Identity).seed(seed).build()
    }

    #[test]
    fn test_count_template_uses_labels() {
        let mut record = QueryRecord::new(101)
            .with_mapping("e_to_e_out", "P_genre")
            .with_mapping("e_out", "Board_game")
            .with_answer_num(-1);

        verbalizer(1).verbalize(&mut record).unwrap();

        let question = record.question_verbalized.as_deref().unwrap();
        assert!(
            question == "How many things are there whose <P_genre> is <Board_game>?"
                || question == "Give me a count of things whose <P_genre> is <Board_game>?",
            "unexpected question: {}",
            question
        );
        assert_eq!(record.mapping["prefix"], "What");
        assert_eq!(record.mapping_sf.as_ref().unwrap()["e_out"], "Board_game");
    }

    #[test]
    fn test_singular_answer_adds_no_plural_keys() {
        let mut v = verbalizer(3);
        let mut record = QueryRecord::new(2)
            .with_mapping("e_in_to_e", "sport")
            .with_mapping("e_in", "PUP")
            .with_answer_num(1);

        v.verbalize(&mut record).unwrap();

        assert!(v.flags().is_empty());
        let sf = record.mapping_sf.as_ref().unwrap();
        assert!(sf.keys().all(|k| !k.ends_with(PLURAL_SUFFIX)));
        assert_eq!(
            record.question_verbalized.as_deref(),
            Some("What is the <sport> of <PUP>?")
        );
    }

    #[test]
    fn test_plural_answer_adds_plural_keys() {
        let mut v = verbalizer(3);
        let mut record = QueryRecord::new(2)
            .with_mapping("e_in_to_e", "sport")
            .with_mapping("e_in", "PUP")
            .with_answer_num(13)
            .with_answer_type(DBPEDIA_AGENT);

        v.verbalize(&mut record).unwrap();

        assert!(v.flags().contains(ConditionKind::Plural));
        let sf = record.mapping_sf.as_ref().unwrap();
        assert_eq!(sf["e_in_to_e_s"], "sports");
        assert_eq!(sf["e_in_s"], "PUPs");
        assert_eq!(
            record.question_verbalized.as_deref(),
            Some("Who are the <sports> of <PUP>?")
        );
    }

    #[test]
    fn test_flags_reset_between_calls() {
        let mut v = verbalizer(5);
        let mut plural = QueryRecord::new(1)
            .with_mapping("e_to_e_out", "genre")
            .with_mapping("e_out", "Board game")
            .with_mapping("class_uri", "game")
            .with_answer_num(50);
        v.verbalize(&mut plural).unwrap();
        assert!(!v.flags().is_empty());

        let mut single = plural.clone().with_answer_num(1);
        v.verbalize(&mut single).unwrap();
        assert!(v.flags().is_empty());
        assert!(!single.mapping_sf.unwrap().contains_key("e_out_s"));
    }

    #[test]
    fn test_repeat_verbalization_gives_same_surface_forms() {
        let mut v = verbalizer(8);
        let record = QueryRecord::new(2)
            .with_mapping("e_in_to_e", "sport")
            .with_mapping("e_in", "PUP")
            .with_answer_num(13);

        let first = v.verbalized(record.clone()).unwrap();
        let second = v.verbalized(first.clone()).unwrap();

        assert!(v.flags().contains(ConditionKind::Plural));
        assert_eq!(first.mapping_sf, second.mapping_sf);
        assert_eq!(first.mapping, second.mapping);
        assert_eq!(
            first.mapping_sf.as_ref().unwrap().keys().collect::<Vec<_>>(),
            second.mapping_sf.as_ref().unwrap().keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_same_seed_same_template() {
        let record = QueryRecord::new(102)
            .with_mapping("e_in_to_e", "sport")
            .with_mapping("e_in", "PUP")
            .with_answer_num(13);

        let first: Vec<_> = {
            let mut v = verbalizer(42);
            (0..10)
                .map(|_| v.verbalized(record.clone()).unwrap().question_template)
                .collect()
        };
        let second: Vec<_> = {
            let mut v = verbalizer(42);
            (0..10)
                .map(|_| v.verbalized(record.clone()).unwrap().question_template)
                .collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let mut record = QueryRecord::new(404);
        let err = verbalizer(0).verbalize(&mut record).unwrap_err();
        assert!(matches!(err, VerbalizeError::NotFound { template_id: 404 }));
        assert!(!record.is_verbalized());
    }

    #[test]
    fn test_resolution_failure_leaves_record_untouched() {
        let mut v = Verbalizer::builder().resolver(Failing).seed(0).build();
        let mut record = QueryRecord::new(101)
            .with_mapping("e_to_e_out", "genre")
            .with_mapping("e_out", "Board_game");
        let before = record.clone();

        let err = v.verbalize(&mut record).unwrap_err();
        assert!(matches!(err, VerbalizeError::Resolution(_)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_missing_placeholder_is_reported() {
        let mut catalog = TemplateCatalog::new();
        catalog
            .register(9, TemplateNode::leaf(["%(prefix)s is <%(e_out)s>?"]))
            .unwrap();
        let mut v = Verbalizer::builder()
            .catalog(catalog)
            .resolver(Identity)
            .seed(0)
            .build();

        let mut record = QueryRecord::new(9).with_mapping("e_in", "x");
        match v.verbalize(&mut record).unwrap_err() {
            VerbalizeError::MissingPlaceholder { name, .. } => assert_eq!(name, "e_out"),
            other => panic!("expected MissingPlaceholder, got {:?}", other),
        }
        assert!(!record.is_verbalized());
    }

    #[test]
    fn test_builtins_leave_no_placeholders() {
        let mut v = verbalizer(11);
        for (id, count) in [(1, 1), (1, 7), (2, 1), (2, 7), (101, 0), (102, 13)] {
            let mut record = QueryRecord::new(id)
                .with_mapping("e_to_e_out", "genre")
                .with_mapping("e_out", "Board game")
                .with_mapping("class_uri", "game")
                .with_mapping("e_in_to_e", "sport")
                .with_mapping("e_in", "PUP")
                .with_answer_num(count);
            v.verbalize(&mut record).unwrap();
            let question = record.question_verbalized.unwrap();
            assert!(!has_placeholders(&question), "{}", question);
        }
    }

    #[test]
    fn test_possessive_prefix_available() {
        let mut catalog = TemplateCatalog::new();
        catalog
            .register(
                50,
                TemplateNode::leaf(["%(prefix_possessive)s <%(e_to_e_out)s> is <%(e_out)s>?"]),
            )
            .unwrap();
        let mut v = Verbalizer::builder()
            .catalog(catalog)
            .resolver(Identity)
            .seed(0)
            .build();
        let mut record = QueryRecord::new(50)
            .with_mapping("e_to_e_out", "spouse")
            .with_mapping("e_out", "Ada")
            .with_answer_type(DBPEDIA_AGENT);

        v.verbalize(&mut record).unwrap();
        assert_eq!(
            record.question_verbalized.as_deref(),
            Some("Whose <spouse> is <Ada>?")
        );
        assert_eq!(record.mapping["prefix"], "Who");
    }

    #[test]
    fn test_from_config_defaults() {
        let v = VerbalizerBuilder::from_config(&VerbalizerConfig::default())
            .unwrap()
            .build();
        assert_eq!(v.catalog().len(), 4);
    }
}
