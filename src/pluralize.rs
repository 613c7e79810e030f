//! Pluralization of surface forms

/// Maps a singular surface form to its plural
pub trait Pluralizer: Send + Sync {
    fn pluralize(&self, surface_form: &str) -> String;
}

/// Rule-based English pluralizer.
///
/// Only the last word of a multi-word label is inflected ("birth place" →
/// "birth places"). Case of the original word is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
];

// Same in singular and plural
const UNCOUNTABLE: &[&str] = &[
    "series", "species", "sheep", "fish", "deer", "aircraft", "equipment", "information",
    "media", "software", "data",
];

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, surface_form: &str) -> String {
        let trimmed = surface_form.trim_end();
        let split = trimmed
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let (head, word) = trimmed.split_at(split);
        format!("{}{}", head, pluralize_word(word))
    }
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() || !word.chars().any(char::is_alphabetic) {
        return word.to_string();
    }

    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }

    let suffix = if lower.ends_with("ch")
        || lower.ends_with("sh")
        || lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
    {
        Suffix::Append("es")
    } else if lower.ends_with('y') && !ends_with_vowel_before(&lower, 1) {
        Suffix::Replace(1, "ies")
    } else if lower.ends_with("fe") {
        Suffix::Replace(2, "ves")
    } else if lower.ends_with('f')
        && !lower.ends_with("ff")
        && !lower.ends_with("ef")
        && !lower.ends_with("oof")
    {
        Suffix::Replace(1, "ves")
    } else {
        Suffix::Append("s")
    };

    match suffix {
        Suffix::Append(s) => format!("{}{}", word, s),
        Suffix::Replace(n, s) => {
            let cut = word
                .char_indices()
                .rev()
                .nth(n - 1)
                .map(|(i, _)| i)
                .unwrap_or(0);
            format!("{}{}", &word[..cut], s)
        }
    }
}

enum Suffix {
    Append(&'static str),
    /// Drop the last n chars, then append
    Replace(usize, &'static str),
}

fn ends_with_vowel_before(lower: &str, from_end: usize) -> bool {
    lower
        .chars()
        .rev()
        .nth(from_end)
        .map(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .unwrap_or(false)
}

fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => {
            let mut out = replacement.to_string();
            if let Some(first) = out.get(..1) {
                let upper = first.to_uppercase();
                out.replace_range(..1, &upper);
            }
            out
        }
        _ => replacement.to_string(),
    }
}
