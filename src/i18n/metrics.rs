//! Issue counts for a validation run.
//!
//! Summaries are derived from the reports after the fact and are used for the
//! closing log lines and the JSON output.

use crate::i18n::{LanguageReport, Reconciliation};
use serde::Serialize;

/// Issue counts for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub language_id: String,
    pub display_name: String,

    /// Number of files with at least one report
    pub files_with_issues: usize,

    /// Reports about whole files
    pub file_warnings: usize,

    /// Reports about individual phrases
    pub phrase_warnings: usize,
}

impl IssueSummary {
    pub fn from_report(report: &LanguageReport) -> Self {
        let file_warnings = report.reports().filter(|r| r.is_file_level()).count();

        Self {
            language_id: report.language_id.clone(),
            display_name: report.display_name.clone(),
            files_with_issues: report.files.len(),
            file_warnings,
            phrase_warnings: report.report_count() - file_warnings,
        }
    }

    /// Total number of reports.
    pub fn total(&self) -> usize {
        self.file_warnings + self.phrase_warnings
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// Totals over every checked language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub languages: Vec<IssueSummary>,
    pub languages_with_issues: usize,
    pub total_reports: usize,
}

impl RunSummary {
    pub fn from_reconciliation(reconciliation: &Reconciliation) -> Self {
        let languages: Vec<IssueSummary> = reconciliation
            .languages
            .iter()
            .map(IssueSummary::from_report)
            .collect();

        Self {
            languages_with_issues: languages.iter().filter(|s| !s.is_clean()).count(),
            total_reports: languages.iter().map(IssueSummary::total).sum(),
            languages,
        }
    }
}
