//! Template Catalog
//!
//! Static registry of question-template trees keyed by numeric template id.
//! Built once (from code or YAML) and read-only afterwards.

mod node;
mod registry;
mod yaml;

pub use node::{ConditionKind, TemplateNode, VANILLA};
pub use registry::TemplateCatalog;
