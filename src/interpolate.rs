//! Named placeholder substitution
//!
//! Templates use `%(name)s` slots; `%%` is a literal percent sign. A `%`
//! followed by anything else is copied through unchanged. Placeholder-shaped
//! text that is not a valid slot (`%(e-out)s`, `%(count)d`, an unclosed
//! `%(`) is rejected rather than leaked into the question.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::error::VerbalizeError;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(?:\(([^)]*)\)(.)?|\(|%)").unwrap());

/// One `%`-construct found in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<'t> {
    Named(&'t str),
    Percent,
    Malformed(&'t str),
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn classify<'t>(caps: &Captures<'t>) -> Slot<'t> {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    match caps.get(1) {
        Some(name) => {
            let conversion = caps.get(2).map(|m| m.as_str());
            if conversion == Some("s") && is_valid_name(name.as_str()) {
                Slot::Named(name.as_str())
            } else {
                Slot::Malformed(whole)
            }
        }
        None if whole == "%%" => Slot::Percent,
        None => Slot::Malformed(whole),
    }
}

fn slots(template: &str) -> impl Iterator<Item = Slot<'_>> {
    PLACEHOLDER_RE.captures_iter(template).map(|caps| classify(&caps))
}

/// Placeholder names referenced by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    slots(template)
        .filter_map(|slot| match slot {
            Slot::Named(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Placeholder-shaped text that is not a valid `%(name)s` slot
pub fn malformed_placeholders(template: &str) -> Vec<&str> {
    slots(template)
        .filter_map(|slot| match slot {
            Slot::Malformed(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Fill every placeholder of `template` from `values`.
///
/// Fails on the first malformed slot or name missing from `values`; nothing
/// is partially returned.
pub fn interpolate(
    template: &str,
    values: &IndexMap<String, String>,
) -> Result<String, VerbalizeError> {
    for slot in slots(template) {
        match slot {
            Slot::Malformed(text) => {
                return Err(VerbalizeError::MalformedPlaceholder {
                    placeholder: text.to_string(),
                    template: template.to_string(),
                })
            }
            Slot::Named(name) if !values.contains_key(name) => {
                return Err(VerbalizeError::MissingPlaceholder {
                    name: name.to_string(),
                    template: template.to_string(),
                })
            }
            _ => {}
        }
    }

    let filled = PLACEHOLDER_RE.replace_all(template, |caps: &Captures| match classify(caps) {
        Slot::Named(name) => values.get(name).cloned().unwrap_or_default(),
        Slot::Percent => "%".to_string(),
        Slot::Malformed(text) => text.to_string(),
    });
    Ok(filled.into_owned())
}

/// Whether `text` still contains a placeholder, well-formed or not
pub fn has_placeholders(text: &str) -> bool {
    slots(text).any(|slot| slot != Slot::Percent)
}
