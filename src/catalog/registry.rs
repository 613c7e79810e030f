//! Template Catalog - built-in question templates keyed by template id
//!
//! Placeholders use the `%(name)s` form. Appending `_s` to a name selects
//! its plural surface form, which is only available when the plural branch
//! was taken.

use std::collections::BTreeMap;

use super::node::{ConditionKind, TemplateNode};
use crate::error::{ConfigurationError, VerbalizeError};
use crate::interpolate::malformed_placeholders;

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<u32, TemplateNode>,
}

impl TemplateCatalog {
    /// Empty catalog; see [`TemplateCatalog::builtin`] for the shipped one
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register_builtins();
        catalog
    }

    /// Root node for a template id
    pub fn get(&self, template_id: u32) -> Result<&TemplateNode, VerbalizeError> {
        self.templates
            .get(&template_id)
            .ok_or(VerbalizeError::NotFound { template_id })
    }

    pub fn contains(&self, template_id: u32) -> bool {
        self.templates.contains_key(&template_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.templates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Add a template tree, rejecting duplicates, empty template lists and
    /// malformed placeholders
    pub fn register(
        &mut self,
        template_id: u32,
        node: TemplateNode,
    ) -> Result<(), ConfigurationError> {
        if self.templates.contains_key(&template_id) {
            return Err(ConfigurationError::DuplicateTemplate { template_id });
        }
        if let Some(path) = node.find_empty_leaf() {
            return Err(ConfigurationError::EmptyLeaf { template_id, path });
        }
        for template in node.all_templates() {
            if let Some(placeholder) = malformed_placeholders(template).first() {
                return Err(ConfigurationError::MalformedPlaceholder {
                    template_id,
                    template: template.to_string(),
                    placeholder: placeholder.to_string(),
                });
            }
        }
        self.templates.insert(template_id, node);
        Ok(())
    }

    fn register_builtins(&mut self) {
        // Entity questions
        self.templates.insert(1, Self::template_1());
        self.templates.insert(2, Self::template_2());

        // Count questions
        self.templates.insert(101, Self::template_101());
        self.templates.insert(102, Self::template_102());
    }

    // =========================================================================
    // Entity Templates
    // =========================================================================

    /// `?uri <e_to_e_out> <e_out>`
    fn template_1() -> TemplateNode {
        TemplateNode::branch(
            ConditionKind::Plural,
            TemplateNode::leaf([
                "%(prefix)s is the <%(class_uri)s> whose <%(e_to_e_out)s> is <%(e_out)s>?",
                "%(prefix)s <%(e_to_e_out)s> is <%(e_out)s>?",
            ]),
            TemplateNode::leaf([
                "%(prefix)s are the things whose <%(e_to_e_out)s> is <%(e_out)s>?",
                "%(prefix)s <%(e_to_e_out)s> is <%(e_out)s>?",
            ]),
        )
    }

    /// `<e_in> <e_in_to_e> ?uri`
    fn template_2() -> TemplateNode {
        TemplateNode::branch(
            ConditionKind::Plural,
            TemplateNode::leaf(["%(prefix)s is the <%(e_in_to_e)s> of <%(e_in)s>?"]),
            TemplateNode::leaf(["%(prefix)s are the <%(e_in_to_e_s)s> of <%(e_in)s>?"]),
        )
    }

    // =========================================================================
    // Count Templates
    // =========================================================================

    fn template_101() -> TemplateNode {
        TemplateNode::leaf([
            "How many things are there whose <%(e_to_e_out)s> is <%(e_out)s>?",
            "Give me a count of things whose <%(e_to_e_out)s> is <%(e_out)s>?",
        ])
    }

    fn template_102() -> TemplateNode {
        TemplateNode::leaf([
            "Count the number of <%(e_in_to_e)s> in <%(e_in)s>?",
            "Count the <%(e_in_to_e)s> in <%(e_in)s>?",
            "How many <%(e_in_to_e)s> are there in <%(e_in)s>?",
        ])
    }
}
