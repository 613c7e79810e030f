//! Question-word classification
//!
//! Picks "Who" or "What" for the `prefix` placeholder from the answer's
//! ontology types.

use std::fmt;

pub const DBPEDIA_AGENT: &str = "http://dbpedia.org/ontology/Agent";
pub const DBPEDIA_ORGANISATION: &str = "http://dbpedia.org/ontology/Organisation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixWord {
    Who,
    What,
}

impl PrefixWord {
    /// "Who" / "What"
    pub const fn plain(&self) -> &'static str {
        match self {
            PrefixWord::Who => "Who",
            PrefixWord::What => "What",
        }
    }

    /// "Whose" / "What's"
    pub const fn possessive(&self) -> &'static str {
        match self {
            PrefixWord::Who => "Whose",
            PrefixWord::What => "What's",
        }
    }
}

impl fmt::Display for PrefixWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plain())
    }
}

/// Maps the answer type set to a question word
pub trait PrefixClassifier: Send + Sync {
    fn classify(&self, answer_type: &[String]) -> PrefixWord;
}

/// "Who" for agents that are not organisations, "What" otherwise
#[derive(Debug, Clone)]
pub struct AgentPrefixClassifier {
    agent_type: String,
    organisation_type: String,
}

impl Default for AgentPrefixClassifier {
    fn default() -> Self {
        Self::new(DBPEDIA_AGENT, DBPEDIA_ORGANISATION)
    }
}

impl AgentPrefixClassifier {
    pub fn new(agent_type: impl Into<String>, organisation_type: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            organisation_type: organisation_type.into(),
        }
    }
}

impl PrefixClassifier for AgentPrefixClassifier {
    fn classify(&self, answer_type: &[String]) -> PrefixWord {
        let has = |t: &str| answer_type.iter().any(|a| a == t);
        if has(&self.agent_type) && !has(&self.organisation_type) {
            PrefixWord::Who
        } else {
            PrefixWord::What
        }
    }
}
