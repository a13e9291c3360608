//! Keyword-based context retrieval against the knowledge base.
//!
//! Pure string matching, no embeddings: the base is small enough that a
//! token-set intersection per entry is effectively free, and deterministic
//! output keeps the composed prompt reproducible for a given snapshot.

use std::collections::HashSet;

use crate::interview::knowledge::{KnowledgeBase, KnowledgeEntry};
use crate::interview::session::Mode;

/// Upper bound on returned snippets when any entry matched.
pub const MAX_SNIPPETS: usize = 4;
/// Number of leading entries returned when nothing matched, so the prompt is
/// never context-free.
const FALLBACK_SNIPPETS: usize = 2;

/// Splits text into lowercase ASCII-alphanumeric runs.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Selects up to `MAX_SNIPPETS` entries for the given session parameters.
///
/// The query token set is built from the job description, focus areas, and
/// target role. Entries are filtered by mode, scored by keyword overlap, and
/// stably sorted by descending score. With no positive score the first two
/// mode-filtered entries are returned instead.
pub fn retrieve<'a>(
    kb: &'a KnowledgeBase,
    job_description: &str,
    focus_areas: &[String],
    mode: Mode,
    target_role: &str,
) -> Vec<&'a KnowledgeEntry> {
    let query = format!("{} {} {}", job_description, focus_areas.join(" "), target_role);
    let tokens: HashSet<String> = tokenize(&query).into_iter().collect();

    let filtered: Vec<&KnowledgeEntry> = kb
        .entries()
        .iter()
        .filter(|entry| entry.applies_to(mode))
        .collect();

    let mut scored: Vec<(&KnowledgeEntry, usize)> = filtered
        .iter()
        .map(|entry| (*entry, score_entry(entry, &tokens)))
        .collect();
    // sort_by is stable: ties keep their knowledge-base order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let top: Vec<&KnowledgeEntry> = scored
        .iter()
        .copied()
        .filter(|(_, score)| *score > 0)
        .take(MAX_SNIPPETS)
        .map(|(entry, _)| entry)
        .collect();

    if !top.is_empty() {
        return top;
    }
    filtered.into_iter().take(FALLBACK_SNIPPETS).collect()
}

/// Count of entry keywords present in the query token set, case-folded.
fn score_entry(entry: &KnowledgeEntry, tokens: &HashSet<String>) -> usize {
    entry
        .keywords
        .iter()
        .filter(|keyword| tokens.contains(&keyword.to_lowercase()))
        .count()
}
