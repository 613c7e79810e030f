//! YAML authoring format for template catalogs
//!
//! ```yaml
//! 2:
//!   vanilla:
//!     - "%(prefix)s is the <%(e_in_to_e)s> of <%(e_in)s>?"
//!   plural:
//!     - "%(prefix)s are the <%(e_in_to_e_s)s> of <%(e_in)s>?"
//! 101:
//!   - "How many things are there whose <%(e_to_e_out)s> is <%(e_out)s>?"
//! ```
//!
//! Parsing goes through a loose DTO first; conversion into [`TemplateNode`]
//! enforces the vanilla / single-condition rules.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::node::{join_path, ConditionKind, TemplateNode, VANILLA};
use super::registry::TemplateCatalog;
use crate::error::ConfigurationError;

/// Authored node before validation
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeDto {
    Templates(Vec<String>),
    Conditions(BTreeMap<String, NodeDto>),
}

impl TemplateCatalog {
    /// Parse and validate a YAML catalog
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigurationError> {
        let entries: BTreeMap<u32, NodeDto> = serde_yaml::from_str(yaml)?;
        let mut catalog = TemplateCatalog::new();
        for (template_id, dto) in entries {
            let node = dto_to_node(template_id, dto, "")?;
            catalog.register(template_id, node)?;
        }
        tracing::debug!(templates = catalog.len(), "loaded template catalog");
        Ok(catalog)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }
}

fn dto_to_node(
    template_id: u32,
    dto: NodeDto,
    path: &str,
) -> Result<TemplateNode, ConfigurationError> {
    let mut branches = match dto {
        NodeDto::Templates(templates) => {
            if templates.is_empty() {
                return Err(ConfigurationError::EmptyLeaf {
                    template_id,
                    path: path.to_string(),
                });
            }
            return Ok(TemplateNode::Leaf(templates));
        }
        NodeDto::Conditions(branches) => branches,
    };

    let vanilla = branches
        .remove(VANILLA)
        .ok_or_else(|| ConfigurationError::MissingVanilla {
            template_id,
            path: path.to_string(),
        })?;

    if branches.len() > 1 {
        return Err(ConfigurationError::MultipleConditions {
            template_id,
            path: path.to_string(),
            conditions: branches.into_keys().collect(),
        });
    }

    let vanilla_path = join_path(path, VANILLA);
    match branches.pop_first() {
        // A vanilla-only level carries no decision
        None => dto_to_node(template_id, vanilla, &vanilla_path),
        Some((name, alternate)) => {
            let condition = ConditionKind::parse(&name).ok_or_else(|| {
                ConfigurationError::UnknownCondition {
                    template_id,
                    path: path.to_string(),
                    condition: name.clone(),
                }
            })?;
            let alternate_path = join_path(path, &name);
            Ok(TemplateNode::branch(
                condition,
                dto_to_node(template_id, vanilla, &vanilla_path)?,
                dto_to_node(template_id, alternate, &alternate_path)?,
            ))
        }
    }
}
