//! Phrase model: the parsed contents of a translation file.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Key of the entry that declares a phrase's format parameters.
pub const FORMAT_KEY: &str = "#format";

// Positional placeholder such as `{1}` (cached for performance)
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// A single entry of a phrase: either a language's text or the `#format` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    language_id: String,
    text: String,
    param_count: usize,
}

impl Translation {
    /// Create a translation entry, deriving its parameter count.
    ///
    /// For the `#format` entry the count is the number of comma separated
    /// descriptors (`"{1:s},{2:d}"` has two). For every other entry it is the
    /// number of `{N}` placeholders in the text.
    pub fn new(language_id: impl Into<String>, text: impl Into<String>) -> Self {
        let language_id = language_id.into();
        let text = text.into();
        let param_count = if language_id == FORMAT_KEY {
            count_format_params(&text)
        } else {
            count_placeholders(&text)
        };

        Self {
            language_id,
            text,
            param_count,
        }
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Whether this is the `#format` header rather than a language's text.
    pub fn is_format(&self) -> bool {
        self.language_id == FORMAT_KEY
    }
}

/// Count the parameters declared by a `#format` value.
pub fn count_format_params(text: &str) -> usize {
    text.matches(',').count() + 1
}

/// Count the non-overlapping `{N}` placeholders in a translated string.
pub fn count_placeholders(text: &str) -> usize {
    let regex = PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{[0-9]+\}").expect("placeholder regex is valid"));
    regex.find_iter(text).count()
}

/// A translatable phrase with its optional format header and translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub key: String,
    pub format: Option<Translation>,
    pub translations: Vec<Translation>,
}

impl Phrase {
    /// Build a phrase from its raw `(language id, text)` entries in source order.
    ///
    /// The `#format` entry is split off into [`Phrase::format`]; every other
    /// entry becomes a translation.
    pub fn from_entries<K, V>(
        key: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut format = None;
        let mut translations = Vec::new();

        for (language_id, text) in entries {
            let translation = Translation::new(language_id, text);
            if translation.is_format() {
                format = Some(translation);
            } else {
                translations.push(translation);
            }
        }

        Self {
            key: key.into(),
            format,
            translations,
        }
    }

    /// The translation for `language_id`, if the phrase has one.
    pub fn translation(&self, language_id: &str) -> Option<&Translation> {
        self.translations
            .iter()
            .find(|translation| translation.language_id == language_id)
    }
}

/// One translation file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseFile {
    pub filename: String,
    pub phrases: Vec<Phrase>,

    /// Parse failure message; `phrases` is empty when this is set.
    pub error: Option<String>,
}

impl PhraseFile {
    pub fn new(filename: impl Into<String>, phrases: Vec<Phrase>) -> Self {
        Self {
            filename: filename.into(),
            phrases,
            error: None,
        }
    }

    /// A file that could not be read or parsed.
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            phrases: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// First phrase with the given key.
    pub fn phrase(&self, key: &str) -> Option<&Phrase> {
        self.phrases.iter().find(|phrase| phrase.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
