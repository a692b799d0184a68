//! Markdown and console rendering of validation reports.

use crate::i18n::LanguageReport;
use std::fmt::Write;

/// Text used for a language without reports.
pub const NO_ISSUES: &str = "No issues found";

/// Render a language's reports as Markdown.
///
/// Each file gets a heading linking to `<link_base>/<language id>/<filename>`,
/// its file warnings in bold and a table of phrase warnings.
pub fn render_markdown(report: &LanguageReport, link_base: &str) -> String {
    if report.is_clean() {
        return NO_ISSUES.to_string();
    }

    let link_base = link_base.trim_end_matches('/');
    let mut markdown = String::new();

    for (filename, reports) in &report.files {
        let _ = writeln!(
            markdown,
            "## [{}]({}/{}/{})",
            filename, link_base, report.language_id, filename
        );

        let mut table_started = false;
        for entry in reports {
            if !entry.file_warning.is_empty() {
                let _ = writeln!(markdown, "**{}**", entry.file_warning);
            }
            if !entry.phrase_warning.is_empty() {
                if !table_started {
                    markdown.push_str("| Phrase | Issue |\n| ------- | --------- |\n");
                    table_started = true;
                }
                let _ = writeln!(
                    markdown,
                    "| `{}` | {} |",
                    escape_cell(&entry.phrase_key),
                    escape_cell(&entry.phrase_warning)
                );
            }
        }
        markdown.push('\n');
    }

    markdown
}

/// Render a language's reports as plain console text.
pub fn render_console(report: &LanguageReport) -> String {
    let mut text = format!(
        "Report for {} ({})\n",
        report.display_name, report.language_id
    );

    if report.is_clean() {
        let _ = writeln!(text, "  {}", NO_ISSUES);
        return text;
    }

    for entry in report.reports() {
        if !entry.file_warning.is_empty() {
            let _ = writeln!(text, "  {} ({})", entry.file_warning, entry.filename);
        }
        if !entry.phrase_warning.is_empty() {
            let _ = writeln!(
                text,
                "  {}: \"{}\" -> {}",
                entry.filename, entry.phrase_key, entry.phrase_warning
            );
        }
    }

    text
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
