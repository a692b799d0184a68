//! Translation file loader.
//!
//! Reads every `*.txt` file in a directory as a KeyValues document with a
//! top-level `"Phrases"` section. Broken files are kept as [`PhraseFile`]s
//! carrying an error message so a single bad file never stops a run.

use crate::i18n::{Phrase, PhraseFile};
use crate::keyvalues::{self, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Name of the top-level section of a translation file.
pub const PHRASES_SECTION: &str = "Phrases";

const TRANSLATION_FILE_EXTENSION: &str = "txt";

/// Load every translation file directly inside `dir`, ordered by filename.
///
/// A directory that does not exist yields an empty list.
pub fn load_phrase_files(dir: &Path) -> Vec<PhraseFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No translation files in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str())
                    == Some(TRANSLATION_FILE_EXTENSION)
        })
        .collect();
    paths.sort();

    paths.iter().filter_map(|path| load_phrase_file(path)).collect()
}

/// Load a single translation file.
///
/// Returns `None` when the file parses but has no `"Phrases"` section.
pub fn load_phrase_file(path: &Path) -> Option<PhraseFile> {
    debug!("Parsing {}", path.display());

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            error!("Error reading {}: {}", display_path(path), e);
            return Some(PhraseFile::failed(filename, e.to_string()));
        }
    };

    parse_phrase_file(&filename, &source).unwrap_or_else(|message| {
        error!("Error parsing {}: {}", display_path(path), message);
        Some(PhraseFile::failed(filename, message))
    })
}

/// Parse the text of a translation file.
///
/// `Err` carries the parse failure message; `Ok(None)` means the document is
/// valid KeyValues without a `"Phrases"` section.
pub fn parse_phrase_file(filename: &str, source: &str) -> Result<Option<PhraseFile>, String> {
    let document = keyvalues::parse(source).map_err(|e| e.to_string())?;

    let Some(phrases) = document.get(PHRASES_SECTION).and_then(Value::as_section) else {
        error!(
            "File {} does not start with a \"{}\" section",
            filename, PHRASES_SECTION
        );
        return Ok(None);
    };

    let mut parsed = Vec::with_capacity(phrases.len());
    for (key, entries) in phrases {
        let Some(entries) = entries.as_section() else {
            warn!("Skipping phrase \"{}\" in {}: not a section", key, filename);
            continue;
        };

        let entries = entries.iter().filter_map(|(language_id, value)| match value {
            Value::String(text) => Some((language_id.as_str(), text.as_str())),
            Value::Section(_) => {
                warn!(
                    "Skipping nested section \"{}\" of phrase \"{}\" in {}",
                    language_id, key, filename
                );
                None
            }
        });
        parsed.push(Phrase::from_entries(key.as_str(), entries));
    }

    Ok(Some(PhraseFile::new(filename, parsed)))
}

/// Shorten a path to start at its `translations` component for log output.
fn display_path(path: &Path) -> String {
    let full = path.display().to_string();
    match full.find("translations") {
        Some(index) => full[index..].to_string(),
        None => full,
    }
}
