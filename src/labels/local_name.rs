//! Offline labels from URI local names

use percent_encoding::percent_decode_str;
use url::Url;

use super::LabelResolver;
use crate::error::ResolutionError;

/// Derives a label from the fragment or last path segment of a URI.
///
/// `http://dbpedia.org/resource/Board_game` → `Board game`,
/// `http://www.w3.org/2002/07/owl#Thing` → `Thing`.
#[derive(Debug, Clone, Copy)]
pub struct LocalNameResolver {
    /// Replace `_` with spaces in the local name
    pub underscores_to_spaces: bool,
}

impl Default for LocalNameResolver {
    fn default() -> Self {
        Self {
            underscores_to_spaces: true,
        }
    }
}

impl LocalNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep local names verbatim (`Board_game`)
    pub fn verbatim() -> Self {
        Self {
            underscores_to_spaces: false,
        }
    }
}

impl LabelResolver for LocalNameResolver {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
        let invalid = |reason: &str| ResolutionError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;

        let local = match parsed.fragment().filter(|f| !f.is_empty()) {
            Some(fragment) => fragment,
            None => parsed
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .ok_or_else(|| invalid("no local name"))?,
        };

        let decoded = percent_decode_str(local)
            .decode_utf8()
            .map_err(|e| invalid(&e.to_string()))?;

        let label = if self.underscores_to_spaces {
            decoded.replace('_', " ")
        } else {
            decoded.into_owned()
        };
        let label = label.trim();
        if label.is_empty() {
            return Err(invalid("empty local name"));
        }
        Ok(label.to_string())
    }
}
