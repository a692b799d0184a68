//! Language registry: every language declared in `languages.cfg` with its
//! translation files loaded.
//!
//! The registry is built once per run and passed explicitly through the
//! pipeline. The baseline language reads its files from the translation root;
//! every other language reads from `<root>/<language id>/`.

use crate::i18n::loader::load_phrase_files;
use crate::i18n::Language;
use crate::keyvalues::{self, KeyValues, Value};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the top-level section of the language manifest.
pub const LANGUAGES_SECTION: &str = "Languages";

/// Problems with the language manifest that make a run impossible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("language manifest has no \"Languages\" section")]
    MissingLanguagesSection,

    #[error("language \"{0}\" must map to a display name, not a section")]
    InvalidLanguageEntry(String),

    /// Only [`LanguageRegistry::new`] can see this: a manifest's repeated
    /// keys have already collapsed into one entry when it is parsed.
    #[error("language \"{0}\" is declared more than once")]
    DuplicateLanguage(String),

    #[error("baseline language \"en\" is not declared")]
    MissingBaseline,
}

/// All languages of a run, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Create a registry from already constructed languages.
    ///
    /// Fails unless exactly one language has the baseline id and ids are unique.
    pub fn new(languages: Vec<Language>) -> Result<Self, RegistryError> {
        for (index, language) in languages.iter().enumerate() {
            if languages[..index].iter().any(|other| other.id == language.id) {
                return Err(RegistryError::DuplicateLanguage(language.id.clone()));
            }
        }

        if !languages.iter().any(Language::is_baseline) {
            return Err(RegistryError::MissingBaseline);
        }

        Ok(Self { languages })
    }

    /// Build the (file-less) registry from a parsed language manifest.
    pub fn from_manifest(manifest: &KeyValues) -> Result<Self, RegistryError> {
        let section = manifest
            .get(LANGUAGES_SECTION)
            .and_then(Value::as_section)
            .ok_or(RegistryError::MissingLanguagesSection)?;

        let languages = section
            .iter()
            .map(|(id, name)| {
                name.as_str()
                    .map(|name| Language::new(id.as_str(), name))
                    .ok_or_else(|| RegistryError::InvalidLanguageEntry(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(languages)
    }

    /// Read and parse the language manifest at `path`.
    pub fn from_manifest_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read language manifest {}", path.display()))?;
        let manifest = keyvalues::parse(&source)
            .with_context(|| format!("Failed to parse language manifest {}", path.display()))?;

        Ok(Self::from_manifest(&manifest)?)
    }

    /// Read the manifest and load every language's translation files.
    pub fn load(manifest_path: &Path, translation_root: &Path) -> Result<Self> {
        info!("Parsing {}...", manifest_path.display());
        let mut registry = Self::from_manifest_file(manifest_path)?;
        info!("Available languages: {}", registry.languages.len());

        registry.load_files(translation_root);
        Ok(registry)
    }

    /// Populate every language with the files found under `translation_root`.
    pub fn load_files(&mut self, translation_root: &Path) {
        for language in &mut self.languages {
            let dir = if language.is_baseline() {
                translation_root.to_path_buf()
            } else {
                translation_root.join(&language.id)
            };
            language.files = load_phrase_files(&dir);

            if language.is_baseline() {
                for file in language.files.iter().filter(|file| file.error.is_some()) {
                    warn!(
                        "Baseline file {} failed to parse; its phrases are ignored",
                        file.filename
                    );
                }
            }
        }
    }

    /// The baseline language.
    ///
    /// # Panics
    /// Never in practice: every constructor rejects a registry without one.
    pub fn baseline(&self) -> &Language {
        self.languages
            .iter()
            .find(|language| language.is_baseline())
            .expect("registry is constructed with a baseline language")
    }

    /// Get a language by its id.
    pub fn get_by_id(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|language| language.id == id)
    }

    /// All languages, including the baseline.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Every language that is checked against the baseline.
    pub fn targets(&self) -> impl Iterator<Item = &Language> {
        self.languages
            .iter()
            .filter(|language| !language.is_baseline())
    }
}
