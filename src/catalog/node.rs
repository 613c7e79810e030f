//! Template tree nodes
//!
//! A catalog entry is a small decision tree. Each branch tests exactly one
//! condition and always carries the vanilla fallback, so the "one condition
//! per level" rule cannot be violated once a tree exists.

use std::fmt;

/// Name of the default branch in authored catalogs
pub const VANILLA: &str = "vanilla";

/// Grammatical condition a branch can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Answer count at or above the plurality threshold
    Plural,
}

impl ConditionKind {
    pub const ALL: &'static [ConditionKind] = &[ConditionKind::Plural];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Plural => "plural",
        }
    }

    /// Parse an authored condition key. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    /// Concrete candidate templates
    Leaf(Vec<String>),
    Branch {
        condition: ConditionKind,
        vanilla: Box<TemplateNode>,
        /// Taken when `condition` holds for the record
        alternate: Box<TemplateNode>,
    },
}

impl TemplateNode {
    pub fn leaf<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TemplateNode::Leaf(templates.into_iter().map(Into::into).collect())
    }

    pub fn branch(condition: ConditionKind, vanilla: TemplateNode, alternate: TemplateNode) -> Self {
        TemplateNode::Branch {
            condition,
            vanilla: Box::new(vanilla),
            alternate: Box::new(alternate),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TemplateNode::Leaf(_))
    }

    /// Every template string reachable from this node, vanilla side first
    pub fn all_templates(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_templates(&mut out);
        out
    }

    fn collect_templates<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TemplateNode::Leaf(templates) => out.extend(templates.iter().map(String::as_str)),
            TemplateNode::Branch {
                vanilla, alternate, ..
            } => {
                vanilla.collect_templates(out);
                alternate.collect_templates(out);
            }
        }
    }

    /// Path of the first empty leaf, if any (e.g. `"plural/vanilla"`)
    pub(crate) fn find_empty_leaf(&self) -> Option<String> {
        match self {
            TemplateNode::Leaf(templates) if templates.is_empty() => Some(String::new()),
            TemplateNode::Leaf(_) => None,
            TemplateNode::Branch {
                condition,
                vanilla,
                alternate,
            } => vanilla
                .find_empty_leaf()
                .map(|p| join_path(VANILLA, &p))
                .or_else(|| {
                    alternate
                        .find_empty_leaf()
                        .map(|p| join_path(condition.as_str(), &p))
                }),
        }
    }
}

pub(crate) fn join_path(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{}/{}", head, tail),
    }
}
