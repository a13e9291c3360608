//! Static interviewer knowledge base: reference snippets tagged with keyword
//! triggers and the interview modes they apply to. The data file is embedded
//! at compile time and parsed once at startup; entries are immutable after
//! that.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::interview::session::Mode;

const BUILTIN_KNOWLEDGE: &str = include_str!("../../data/knowledge_base.json");

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Modes this entry applies to. Empty means it applies to all modes.
    #[serde(default)]
    pub modes: Vec<String>,
    pub snippet: String,
}

impl KnowledgeEntry {
    pub fn applies_to(&self, mode: Mode) -> bool {
        self.modes.is_empty()
            || self
                .modes
                .iter()
                .any(|m| m == mode.as_str() || m == Mode::Both.as_str())
    }
}

/// Ordered collection of knowledge entries. Order matters: ties during
/// retrieval and the no-match fallback both preserve it.
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn builtin() -> Result<Self> {
        let entries: Vec<KnowledgeEntry> =
            serde_json::from_str(BUILTIN_KNOWLEDGE).context("invalid builtin knowledge base")?;
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
