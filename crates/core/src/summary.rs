//! Plain-language summaries of clinical notes.
//!
//! A summary is produced by lower-casing the note, applying an ordered list
//! of phrase substitutions one after another, and upper-casing the first
//! character. Substitutions run sequentially, so a later phrase may match
//! text produced by an earlier replacement.

use std::path::Path;
use std::sync::LazyLock;

use crate::error::CoreError;

/// Built-in substitution table, applied in this order.
pub const BUILTIN_PHRASES: &[(&str, &str)] = &[
    ("patient shows improvement", "the patient is getting better"),
    ("blood pressure", "blood pressure"),
    ("readings", "measurements"),
    ("symptoms", "signs of illness"),
    ("diagnosis", "medical condition"),
    ("treatment", "care plan"),
    ("medication", "medicine"),
    ("prescribed", "given"),
    ("administered", "given"),
    ("monitoring", "watching"),
    ("follow-up", "next visit"),
    ("appointment", "visit"),
    ("consultation", "doctor visit"),
];

static BUILTIN: LazyLock<PhraseTable> = LazyLock::new(|| PhraseTable {
    phrases: BUILTIN_PHRASES
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect(),
});

/// Ordered phrase-to-phrase substitution table.
///
/// Phrases are stored lower-cased; matching happens against the lower-cased
/// note, which makes every substitution case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTable {
    phrases: Vec<(String, String)>,
}

impl PhraseTable {
    /// The built-in table, shared process-wide.
    pub fn builtin() -> &'static PhraseTable {
        &BUILTIN
    }

    /// Build a table from `(phrase, replacement)` pairs. Empty phrases are
    /// rejected because they would match between every character.
    pub fn new(phrases: Vec<(String, String)>) -> Result<Self, CoreError> {
        let mut normalized = Vec::with_capacity(phrases.len());
        for (index, (phrase, replacement)) in phrases.into_iter().enumerate() {
            if phrase.is_empty() {
                return Err(CoreError::Validation(format!(
                    "Summary phrase at position {index} is empty"
                )));
            }
            normalized.push((phrase.to_lowercase(), replacement));
        }
        Ok(Self { phrases: normalized })
    }

    /// Parse a table from a JSON array of `[phrase, replacement]` pairs.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let phrases: Vec<(String, String)> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid summary phrase table: {e}")))?;
        Self::new(phrases)
    }

    /// Load a table from a JSON file (see [`PhraseTable::from_json_str`]).
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read summary phrase table {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Rewrite `note` into plain language using this table.
    pub fn summarize(&self, note: &str) -> String {
        let mut text = note.to_lowercase();
        for (phrase, replacement) in &self.phrases {
            if text.contains(phrase.as_str()) {
                text = text.replace(phrase.as_str(), replacement);
            }
        }
        capitalize_first(&text)
    }
}

/// Summarize `note` with the built-in table.
pub fn summarize(note: &str) -> String {
    PhraseTable::builtin().summarize(note)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
