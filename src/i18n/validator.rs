//! Translation consistency validation.
//!
//! Every non-baseline language is checked against the baseline in two passes:
//!
//! - forward: what the language has that the baseline lacks or disagrees with
//!   (unknown files, stray `#format` keys, foreign translations, parameter
//!   count mismatches, missing translations)
//! - backward: what the baseline has that the language lacks (missing files
//!   and phrases)
//!
//! Reports are appended in the order the checks run and are never sorted or
//! deduplicated.

use crate::i18n::{Language, LanguageRegistry, Phrase, PhraseFile};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

/// A single finding about a file or phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// The language has a file the baseline does not.
    FileNotInBaseline,
    /// The language's file has no phrases, including a file that failed to
    /// parse.
    FileEmpty,
    /// The baseline has a file the language does not.
    FileMissing,
    /// A non-baseline phrase declares its own `#format`.
    FormatKeyPresent,
    /// The phrase lives in another baseline file.
    PhraseInOtherFile(String),
    /// No baseline file has the phrase.
    PhraseNotInBaseline,
    /// The phrase carries a translation for another language.
    ForeignTranslation(String),
    ParamCountMismatch { found: usize, expected: usize },
    /// The phrase exists but has no entry for the language itself.
    TranslationMissing,
    /// A baseline phrase is absent from the language's file.
    PhraseMissing,
}

impl Issue {
    /// Whether the issue concerns a whole file rather than a phrase.
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            Issue::FileNotInBaseline | Issue::FileEmpty | Issue::FileMissing
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::FileNotInBaseline => write!(f, "File doesn't exist in English"),
            Issue::FileEmpty => write!(f, "File is empty"),
            Issue::FileMissing => write!(f, "File missing"),
            Issue::FormatKeyPresent => write!(f, "Includes a \"#format\" key"),
            Issue::PhraseInOtherFile(filename) => {
                write!(f, "Phrase exists in a different file in English: {}", filename)
            }
            Issue::PhraseNotInBaseline => write!(f, "Phrase doesn't exist in English"),
            Issue::ForeignTranslation(language_id) => {
                write!(f, "Includes a translation for language \"{}\"", language_id)
            }
            Issue::ParamCountMismatch { found, expected } => write!(
                f,
                "Has {} format parameters, but English has {}",
                found, expected
            ),
            Issue::TranslationMissing => write!(f, "Phrase available, but translation missing"),
            Issue::PhraseMissing => write!(f, "Phrase missing"),
        }
    }
}

/// A diagnostic attributed to a language and file.
///
/// File-level reports only set `file_warning`; phrase-level reports set
/// `phrase_key` and `phrase_warning`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub language_id: String,
    pub filename: String,
    pub file_warning: String,
    pub phrase_key: String,
    pub phrase_warning: String,
}

impl Report {
    /// A report about a whole file.
    pub fn file(language_id: &str, filename: &str, issue: &Issue) -> Self {
        Self {
            language_id: language_id.to_string(),
            filename: filename.to_string(),
            file_warning: issue.to_string(),
            phrase_key: String::new(),
            phrase_warning: String::new(),
        }
    }

    /// A report about one phrase of a file.
    pub fn phrase(language_id: &str, filename: &str, key: &str, issue: &Issue) -> Self {
        Self {
            language_id: language_id.to_string(),
            filename: filename.to_string(),
            file_warning: String::new(),
            phrase_key: key.to_string(),
            phrase_warning: issue.to_string(),
        }
    }

    pub fn is_file_level(&self) -> bool {
        !self.file_warning.is_empty()
    }
}

/// All reports for one language, grouped by filename in first-report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageReport {
    pub language_id: String,
    pub display_name: String,
    pub files: IndexMap<String, Vec<Report>>,
}

impl LanguageReport {
    pub fn new(language: &Language) -> Self {
        Self {
            language_id: language.id.clone(),
            display_name: language.display_name.clone(),
            files: IndexMap::new(),
        }
    }

    /// Check if no issues were found.
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of reports across all files.
    pub fn report_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Reports for one file, in generation order.
    pub fn reports_for(&self, filename: &str) -> &[Report] {
        self.files.get(filename).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every report, file by file.
    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.files.values().flatten()
    }

    fn file_issue(&mut self, filename: &str, issue: Issue) {
        let report = Report::file(&self.language_id, filename, &issue);
        self.push(report);
    }

    fn phrase_issue(&mut self, filename: &str, key: &str, issue: Issue) {
        let report = Report::phrase(&self.language_id, filename, key, &issue);
        self.push(report);
    }

    fn push(&mut self, report: Report) {
        self.files
            .entry(report.filename.clone())
            .or_default()
            .push(report);
    }
}

/// Reports for every non-baseline language, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub languages: Vec<LanguageReport>,
}

impl Reconciliation {
    /// Get the report of a language by its id.
    pub fn language(&self, language_id: &str) -> Option<&LanguageReport> {
        self.languages
            .iter()
            .find(|report| report.language_id == language_id)
    }

    /// Check if every language is clean.
    pub fn is_clean(&self) -> bool {
        self.languages.iter().all(LanguageReport::is_clean)
    }
}

/// Checks languages against a baseline.
pub struct TranslationValidator<'a> {
    baseline: &'a Language,

    /// Phrase key -> first baseline file that defines it
    phrase_index: IndexMap<&'a str, &'a str>,
}

impl<'a> TranslationValidator<'a> {
    /// Create a validator for `baseline`, indexing its phrases by key.
    ///
    /// When a key appears in several baseline files the first file wins.
    pub fn new(baseline: &'a Language) -> Self {
        let mut phrase_index = IndexMap::new();
        for file in &baseline.files {
            for phrase in &file.phrases {
                phrase_index
                    .entry(phrase.key.as_str())
                    .or_insert(file.filename.as_str());
            }
        }

        Self {
            baseline,
            phrase_index,
        }
    }

    /// Validate one language against the baseline.
    pub fn validate(&self, language: &Language) -> LanguageReport {
        let mut report = LanguageReport::new(language);
        self.check_forward(language, &mut report);
        self.check_backward(language, &mut report);
        report
    }

    /// Pass over the language's own files.
    fn check_forward(&self, language: &Language, report: &mut LanguageReport) {
        for file in &language.files {
            let Some(baseline_file) = self.baseline.file(&file.filename) else {
                report.file_issue(&file.filename, Issue::FileNotInBaseline);
                continue;
            };

            // A parse failure leaves the file without phrases; the loader has
            // already logged the error
            if file.is_empty() {
                report.file_issue(&file.filename, Issue::FileEmpty);
                continue;
            }

            for phrase in &file.phrases {
                self.check_phrase(language, file, baseline_file, phrase, report);
            }
        }
    }

    fn check_phrase(
        &self,
        language: &Language,
        file: &PhraseFile,
        baseline_file: &PhraseFile,
        phrase: &Phrase,
        report: &mut LanguageReport,
    ) {
        let filename = file.filename.as_str();
        let key = phrase.key.as_str();

        if phrase.format.is_some() {
            report.phrase_issue(filename, key, Issue::FormatKeyPresent);
        }

        let Some(baseline_phrase) = baseline_file.phrase(key) else {
            let issue = match self.phrase_index.get(key) {
                Some(other) => Issue::PhraseInOtherFile(other.to_string()),
                None => Issue::PhraseNotInBaseline,
            };
            report.phrase_issue(filename, key, issue);
            return;
        };

        let expected = baseline_phrase.format.as_ref().map(|f| f.param_count());

        for translation in &phrase.translations {
            if translation.language_id() != language.id {
                report.phrase_issue(
                    filename,
                    key,
                    Issue::ForeignTranslation(translation.language_id().to_string()),
                );
            }

            if let Some(expected) = expected {
                if translation.param_count() != expected {
                    report.phrase_issue(
                        filename,
                        key,
                        Issue::ParamCountMismatch {
                            found: translation.param_count(),
                            expected,
                        },
                    );
                }
            }
        }

        if phrase.translation(&language.id).is_none() {
            report.phrase_issue(filename, key, Issue::TranslationMissing);
        }
    }

    /// Pass over the baseline's files.
    fn check_backward(&self, language: &Language, report: &mut LanguageReport) {
        for baseline_file in &self.baseline.files {
            let Some(file) = language.file(&baseline_file.filename) else {
                report.file_issue(&baseline_file.filename, Issue::FileMissing);
                continue;
            };

            // Already reported as empty by the forward pass
            if file.is_empty() {
                continue;
            }

            for phrase in &baseline_file.phrases {
                if file.phrase(&phrase.key).is_none() {
                    report.phrase_issue(
                        &baseline_file.filename,
                        &phrase.key,
                        Issue::PhraseMissing,
                    );
                }
            }
        }
    }
}

/// Check every non-baseline language of the registry against the baseline.
pub fn reconcile(registry: &LanguageRegistry) -> Reconciliation {
    let validator = TranslationValidator::new(registry.baseline());

    let languages = registry
        .targets()
        .map(|language| {
            let report = validator.validate(language);
            if report.is_clean() {
                info!("No issues found for {}", language);
            } else {
                error!("Found {} issues for {}", report.files.len(), language);
            }
            report
        })
        .collect();

    Reconciliation { languages }
}
