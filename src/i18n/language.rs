//! Language: one manifest entry together with its parsed translation files.

use crate::i18n::PhraseFile;
use serde::Serialize;

/// Id of the baseline language every other language is checked against.
pub const BASELINE_LANGUAGE: &str = "en";

/// A language declared in `languages.cfg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Short language id (e.g., "en", "de")
    pub id: String,

    /// Human readable name from the manifest (e.g., "German")
    pub display_name: String,

    /// Parsed translation files, in load order
    pub files: Vec<PhraseFile>,
}

impl Language {
    /// Create a language with no files loaded yet.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            files: Vec::new(),
        }
    }

    /// Builder-style helper to attach files.
    pub fn with_files(mut self, files: Vec<PhraseFile>) -> Self {
        self.files = files;
        self
    }

    /// Check if this is the baseline language.
    pub fn is_baseline(&self) -> bool {
        self.id == BASELINE_LANGUAGE
    }

    /// Find a loaded file by name.
    pub fn file(&self, filename: &str) -> Option<&PhraseFile> {
        self.files.iter().find(|file| file.filename == filename)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
