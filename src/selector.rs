//! Template Selector
//!
//! Walks a catalog tree down to a concrete list of candidate templates,
//! testing the record against each branch's condition and remembering which
//! conditions were taken.

use crate::catalog::{ConditionKind, TemplateNode};
use crate::record::QueryRecord;

/// Minimum answer count at which plural phrasing is used
pub const DEFAULT_PLURALITY_THRESHOLD: i64 = 3;

/// Conditions matched during one descent, in the order they were taken
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionFlags {
    taken: Vec<ConditionKind>,
}

impl SelectionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: ConditionKind) {
        self.taken.push(condition);
    }

    pub fn contains(&self, condition: ConditionKind) -> bool {
        self.taken.contains(&condition)
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ConditionKind> + '_ {
        self.taken.iter().copied()
    }

    pub fn clear(&mut self) {
        self.taken.clear();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateSelector {
    plurality_threshold: i64,
}

impl Default for TemplateSelector {
    fn default() -> Self {
        Self::new(DEFAULT_PLURALITY_THRESHOLD)
    }
}

impl TemplateSelector {
    pub fn new(plurality_threshold: i64) -> Self {
        Self {
            plurality_threshold,
        }
    }

    pub fn plurality_threshold(&self) -> i64 {
        self.plurality_threshold
    }

    /// Narrow `node` to its candidate templates for `record`.
    ///
    /// Every condition that holds is appended to `flags`; a branch whose
    /// condition fails falls back to its vanilla side without flagging.
    pub fn select<'a>(
        &self,
        node: &'a TemplateNode,
        record: &QueryRecord,
        flags: &mut SelectionFlags,
    ) -> &'a [String] {
        match node {
            TemplateNode::Leaf(templates) => templates,
            TemplateNode::Branch {
                condition,
                vanilla,
                alternate,
            } => {
                if self.holds(*condition, record) {
                    flags.push(*condition);
                    self.select(alternate, record, flags)
                } else {
                    self.select(vanilla, record, flags)
                }
            }
        }
    }

    fn holds(&self, condition: ConditionKind, record: &QueryRecord) -> bool {
        match condition {
            ConditionKind::Plural => record.answer_num.count() >= self.plurality_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateCatalog;
    use crate::record::AnswerCount;
    use proptest::prelude::*;
    use indexmap::IndexMap;

    fn plural_node() -> TemplateNode {
        TemplateNode::branch(
            ConditionKind::Plural,
            TemplateNode::leaf(["singular"]),
            TemplateNode::leaf(["plural"]),
        )
    }

    #[test]
    fn test_leaf_returned_unchanged() {
        let node = TemplateNode::leaf(["a", "b"]);
        let mut flags = SelectionFlags::new();
        let picked = TemplateSelector::default().select(&node, &QueryRecord::new(1), &mut flags);
        assert_eq!(picked, ["a".to_string(), "b".to_string()]);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_threshold_boundary() {
        let selector = TemplateSelector::default();
        let node = plural_node();

        let mut flags = SelectionFlags::new();
        let two = QueryRecord::new(2).with_answer_num(2);
        assert_eq!(selector.select(&node, &two, &mut flags), ["singular"]);
        assert!(flags.is_empty());

        let three = QueryRecord::new(2).with_answer_num(3);
        assert_eq!(selector.select(&node, &three, &mut flags), ["plural"]);
        assert!(flags.contains(ConditionKind::Plural));
    }

    #[test]
    fn test_per_variable_count() {
        let mut counts = IndexMap::new();
        counts.insert("uri".to_string(), 4);
        let record = QueryRecord::new(2).with_answer_num(AnswerCount::PerVariable(counts));

        let node = plural_node();
        let mut flags = SelectionFlags::new();
        let picked = TemplateSelector::default().select(&node, &record, &mut flags);
        assert_eq!(picked, ["plural"]);
    }

    #[test]
    fn test_vanilla_only_template_ignores_large_count() {
        let catalog = TemplateCatalog::builtin();
        let record = QueryRecord::new(102).with_answer_num(13);
        let mut flags = SelectionFlags::new();
        let picked = TemplateSelector::default().select(catalog.get(102).unwrap(), &record, &mut flags);
        assert_eq!(picked.len(), 3);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_nested_branches_record_each_condition() {
        let node = TemplateNode::branch(
            ConditionKind::Plural,
            TemplateNode::leaf(["v"]),
            TemplateNode::branch(
                ConditionKind::Plural,
                TemplateNode::leaf(["p"]),
                TemplateNode::leaf(["pp"]),
            ),
        );
        let mut flags = SelectionFlags::new();
        let record = QueryRecord::new(1).with_answer_num(10);
        assert_eq!(TemplateSelector::default().select(&node, &record, &mut flags), ["pp"]);
        assert_eq!(flags.iter().count(), 2);
    }

    proptest! {
        #[test]
        fn prop_plural_iff_at_threshold(count in -5i64..200, threshold in 1i64..20) {
            let selector = TemplateSelector::new(threshold);
            let record = QueryRecord::new(1).with_answer_num(count);
            let node = plural_node();
            let mut flags = SelectionFlags::new();
            let picked = selector.select(&node, &record, &mut flags);
            prop_assert_eq!(picked[0] == "plural", count >= threshold);
            prop_assert_eq!(flags.contains(ConditionKind::Plural), count >= threshold);
        }
    }
}
