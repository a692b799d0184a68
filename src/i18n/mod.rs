//! Translation checking for SourceMod-style phrase files.
//!
//! This module holds the data model for parsed translations and the logic
//! that checks every language against the English baseline.
//!
//! # Architecture
//!
//! - `phrase`: Translation, Phrase and PhraseFile value types
//! - `language`: A manifest language with its loaded files
//! - `loader`: Reads a directory of translation files into PhraseFiles
//! - `registry`: Builds every language from `languages.cfg` and the translation root
//! - `validator`: Checks each language against the baseline and collects reports
//! - `metrics`: Issue counts derived from the reports
//!
//! # Example
//!
//! ```rust,ignore
//! use smtranslate::i18n::{reconcile, LanguageRegistry};
//!
//! let registry = LanguageRegistry::load(&manifest_path, &translation_root)?;
//! let reconciliation = reconcile(&registry);
//! ```

mod language;
pub mod loader;
mod metrics;
mod phrase;
mod registry;
mod validator;

pub use language::{Language, BASELINE_LANGUAGE};
pub use metrics::{IssueSummary, RunSummary};
pub use phrase::{
    count_format_params, count_placeholders, Phrase, PhraseFile, Translation, FORMAT_KEY,
};
pub use registry::{LanguageRegistry, RegistryError, LANGUAGES_SECTION};
pub use validator::{
    reconcile, Issue, LanguageReport, Reconciliation, Report, TranslationValidator,
};
