//! The `check` pipeline: load every language, validate, and render reports.

use crate::config::LANGUAGES_FILE;
use crate::i18n::{reconcile, LanguageRegistry, Reconciliation, RunSummary};
use crate::report::{render_console, render_markdown};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Process exit status of a successful run.
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status when issues were found and the run should fail.
pub const EXIT_ISSUES: u8 = 1;

/// Input locations for a check run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Folder holding `config.yml` and `languages.cfg`
    pub config_folder: PathBuf,

    /// Translation root; baseline files live here, other languages in subfolders
    pub translation_folder: PathBuf,
}

impl CheckOptions {
    pub fn manifest_path(&self) -> PathBuf {
        self.config_folder.join(LANGUAGES_FILE)
    }
}

/// Everything a check run produced.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub registry: LanguageRegistry,
    pub reconciliation: Reconciliation,
    pub summary: RunSummary,
}

/// Where and how the results of a run are emitted.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Print JSON instead of the console text reports
    pub json: bool,

    /// Also write one Markdown report per language into this folder
    pub output_dir: Option<PathBuf>,

    /// Base URL for the Markdown file links
    pub link_base: String,

    /// Exit with [`EXIT_ISSUES`] when any language has issues
    pub fail_on_issues: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a RunSummary,
    reports: &'a Reconciliation,
}

impl CheckOutcome {
    /// Serialize the summary and every report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        let output = JsonOutput {
            summary: &self.summary,
            reports: &self.reconciliation,
        };
        serde_json::to_string_pretty(&output).context("Failed to serialize reports")
    }

    /// Console text for every checked language, in manifest order.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for report in &self.reconciliation.languages {
            if !report.is_clean() {
                info!(
                    "Generating report for {} ({})...",
                    report.display_name, report.language_id
                );
            }
            text.push_str(&render_console(report));
        }
        text
    }

    /// Exit status for this run.
    pub fn exit_status(&self, fail_on_issues: bool) -> u8 {
        if fail_on_issues && !self.reconciliation.is_clean() {
            EXIT_ISSUES
        } else {
            EXIT_SUCCESS
        }
    }

    /// Print the results to `out`, write Markdown reports if requested, and
    /// return the exit status.
    pub fn emit(&self, output: &OutputOptions, out: &mut impl Write) -> Result<u8> {
        if output.json {
            writeln!(out, "{}", self.to_json()?).context("Failed to write JSON output")?;
        } else {
            write!(out, "{}", self.to_text()).context("Failed to write reports")?;
        }

        if let Some(dir) = &output.output_dir {
            write_markdown_reports(&self.reconciliation, dir, &output.link_base)?;
        }

        Ok(self.exit_status(output.fail_on_issues))
    }
}

/// Load all languages and check them against the baseline.
pub fn run(options: &CheckOptions) -> Result<CheckOutcome> {
    if !options.translation_folder.is_dir() {
        bail!(
            "Translation folder {} does not exist",
            options.translation_folder.display()
        );
    }

    let registry = LanguageRegistry::load(&options.manifest_path(), &options.translation_folder)?;
    for language in registry.languages() {
        debug!("Loaded {} files for {}", language.files.len(), language);
    }

    info!("Comparing {} languages against English", registry.targets().count());
    let reconciliation = reconcile(&registry);
    let summary = RunSummary::from_reconciliation(&reconciliation);

    info!(
        "Check finished: {} of {} languages have issues ({} reports)",
        summary.languages_with_issues,
        summary.languages.len(),
        summary.total_reports
    );

    Ok(CheckOutcome {
        registry,
        reconciliation,
        summary,
    })
}

/// Write one `<language id>.md` file per checked language into `dir`.
pub fn write_markdown_reports(
    reconciliation: &Reconciliation,
    dir: &Path,
    link_base: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(reconciliation.languages.len());
    for report in &reconciliation.languages {
        let path = dir.join(format!("{}.md", report.language_id));
        fs::write(&path, render_markdown(report, link_base))
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Wrote report for {} to {}", report.display_name, path.display());
        written.push(path);
    }

    Ok(written)
}
