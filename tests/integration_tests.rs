//! Integration tests for the translation checker
//!
//! These tests build a config folder and a translation tree in a temporary
//! directory and run the complete check pipeline against it.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use smtranslate::check::{
    self, CheckOptions, CheckOutcome, OutputOptions, EXIT_ISSUES, EXIT_SUCCESS,
};
use smtranslate::i18n::LanguageReport;
use smtranslate::report::render_markdown;

// ==================== Test Helpers ====================

const LANGUAGES_CFG: &str = r##"
"Languages"
{
    "en"    "English"
    "de"    "German"
    "fr"    "French"
    "es"    "Spanish"
}
"##;

const EN_COMMON: &str = r##"
"Phrases"
{
    "Welcome"
    {
        "#format"   "1"
        "en"        "Hi {0}"
    }
    "Goodbye"
    {
        "en"        "Goodbye"
    }
}
"##;

const EN_CORE: &str = r##"
"Phrases"
{
    "Yes"
    {
        "en"        "Yes"
    }
}
"##;

const DE_COMMON: &str = r##"
"Phrases"
{
    "Welcome"
    {
        "fr"        "Salut {0},{1}"
    }
    "Yes"
    {
        "de"        "Ja"
    }
    "Unknown"
    {
        "de"        "Unbekannt"
    }
}
"##;

const FR_COMMON: &str = r##"
"Phrases"
{
    "Welcome"
    {
        "fr"        "Salut {0}"
    }
    "Goodbye"
    {
        "fr"        "Au revoir"
    }
}
"##;

const FR_CORE: &str = r##"
"Phrases"
{
    "Yes"
    {
        "fr"        "Oui"
    }
}
"##;

struct Fixture {
    _temp_dir: TempDir,
    options: CheckOptions,
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Create a config folder and a translation tree:
/// - en: common + core
/// - de: common with several problems, broken core, an extra file
/// - fr: complete and correct
/// - es: no folder at all
fn create_fixture() -> Fixture {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_folder = temp_dir.path().join("config");
    let translation_folder = temp_dir.path().join("translations");

    write(&config_folder.join("config.yml"), "logging:\n  level: debug\n");
    write(&config_folder.join("languages.cfg"), LANGUAGES_CFG);

    write(&translation_folder.join("common.phrases.txt"), EN_COMMON);
    write(&translation_folder.join("core.phrases.txt"), EN_CORE);

    let de = translation_folder.join("de");
    write(&de.join("common.phrases.txt"), DE_COMMON);
    write(&de.join("core.phrases.txt"), "\"Phrases\"\n{\n  \"Yes\" {\n");
    write(&de.join("extra.phrases.txt"), EN_CORE);

    let fr = translation_folder.join("fr");
    write(&fr.join("common.phrases.txt"), FR_COMMON);
    write(&fr.join("core.phrases.txt"), FR_CORE);

    Fixture {
        _temp_dir: temp_dir,
        options: CheckOptions {
            config_folder,
            translation_folder,
        },
    }
}

fn run_fixture() -> (Fixture, CheckOutcome) {
    let fixture = create_fixture();
    let outcome = check::run(&fixture.options).expect("check should succeed");
    (fixture, outcome)
}

fn language<'a>(outcome: &'a CheckOutcome, id: &str) -> &'a LanguageReport {
    outcome
        .reconciliation
        .language(id)
        .unwrap_or_else(|| panic!("missing report for {}", id))
}

fn phrase_warnings(report: &LanguageReport, filename: &str) -> Vec<(String, String)> {
    report
        .reports_for(filename)
        .iter()
        .filter(|r| !r.is_file_level())
        .map(|r| (r.phrase_key.clone(), r.phrase_warning.clone()))
        .collect()
}

fn file_warnings(report: &LanguageReport, filename: &str) -> Vec<String> {
    report
        .reports_for(filename)
        .iter()
        .filter(|r| r.is_file_level())
        .map(|r| r.file_warning.clone())
        .collect()
}

fn pair(key: &str, warning: &str) -> (String, String) {
    (key.to_string(), warning.to_string())
}

// ==================== Pipeline Tests ====================

#[test]
fn test_registry_loaded_from_tree() {
    let (_fixture, outcome) = run_fixture();

    let ids: Vec<_> = outcome
        .registry
        .languages()
        .iter()
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(ids, vec!["en", "de", "fr", "es"]);
    assert_eq!(outcome.registry.baseline().files.len(), 2);
    assert_eq!(outcome.registry.get_by_id("de").unwrap().files.len(), 3);
    assert!(outcome.registry.get_by_id("es").unwrap().files.is_empty());

    let broken = outcome
        .registry
        .get_by_id("de")
        .unwrap()
        .file("core.phrases.txt")
        .unwrap();
    assert!(broken.phrases.is_empty());
    assert!(broken.error.is_some());
}

#[test]
fn test_baseline_is_not_checked() {
    let (_fixture, outcome) = run_fixture();
    assert!(outcome.reconciliation.language("en").is_none());
    assert_eq!(outcome.reconciliation.languages.len(), 3);
}

#[test]
fn test_german_common_file() {
    let (_fixture, outcome) = run_fixture();
    let de = language(&outcome, "de");

    assert_eq!(
        phrase_warnings(de, "common.phrases.txt"),
        vec![
            pair("Welcome", "Includes a translation for language \"fr\""),
            pair("Welcome", "Has 2 format parameters, but English has 1"),
            pair("Welcome", "Phrase available, but translation missing"),
            pair(
                "Yes",
                "Phrase exists in a different file in English: core.phrases.txt"
            ),
            pair("Unknown", "Phrase doesn't exist in English"),
            pair("Goodbye", "Phrase missing"),
        ]
    );
}

#[test]
fn test_german_file_level_problems() {
    let (_fixture, outcome) = run_fixture();
    let de = language(&outcome, "de");

    assert_eq!(
        file_warnings(de, "extra.phrases.txt"),
        vec!["File doesn't exist in English"]
    );

    // Broken file reads as empty
    assert_eq!(file_warnings(de, "core.phrases.txt"), vec!["File is empty"]);
    // Broken file is not flooded with missing phrases
    assert!(phrase_warnings(de, "core.phrases.txt").is_empty());

    let files: Vec<_> = de.files.keys().map(String::as_str).collect();
    assert_eq!(
        files,
        vec!["common.phrases.txt", "core.phrases.txt", "extra.phrases.txt"]
    );
}

#[test]
fn test_complete_language_is_clean() {
    let (_fixture, outcome) = run_fixture();
    let fr = language(&outcome, "fr");
    assert!(fr.is_clean());
    assert_eq!(render_markdown(fr, "https://example.com"), "No issues found");
}

#[test]
fn test_language_without_folder_misses_every_file() {
    let (_fixture, outcome) = run_fixture();
    let es = language(&outcome, "es");

    assert_eq!(file_warnings(es, "common.phrases.txt"), vec!["File missing"]);
    assert_eq!(file_warnings(es, "core.phrases.txt"), vec!["File missing"]);
    assert!(es.reports().all(|r| r.is_file_level()));
}

#[test]
fn test_summary_counts() {
    let (_fixture, outcome) = run_fixture();

    assert_eq!(outcome.summary.languages_with_issues, 2);
    assert_eq!(outcome.summary.total_reports, 8 + 2);
    assert!(!outcome.reconciliation.is_clean());
}

#[test]
fn test_runs_are_repeatable() {
    let fixture = create_fixture();
    let first = check::run(&fixture.options).unwrap();
    let second = check::run(&fixture.options).unwrap();
    assert_eq!(first.reconciliation, second.reconciliation);
}

// ==================== Output Tests ====================

#[test]
fn test_json_output() {
    let (_fixture, outcome) = run_fixture();
    let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();

    assert_eq!(json["summary"]["total_reports"], 10);
    let de = &json["reports"]["languages"][0];
    assert_eq!(de["language_id"], "de");
    assert_eq!(
        de["files"]["extra.phrases.txt"][0]["file_warning"],
        "File doesn't exist in English"
    );
}

#[test]
fn test_markdown_reports_written() {
    let (fixture, outcome) = run_fixture();
    let out_dir = fixture.options.config_folder.with_file_name("reports");

    let written =
        check::write_markdown_reports(&outcome.reconciliation, &out_dir, "https://example.com/")
            .unwrap();
    assert_eq!(written.len(), 3);

    let de = fs::read_to_string(out_dir.join("de.md")).unwrap();
    assert!(de.contains("## [extra.phrases.txt](https://example.com/de/extra.phrases.txt)"));
    assert!(de.contains("**File doesn't exist in English**"));
    assert!(de.contains("| `Goodbye` | Phrase missing |"));

    let fr = fs::read_to_string(out_dir.join("fr.md")).unwrap();
    assert_eq!(fr, "No issues found");
}

// ==================== Emit and Exit Status Tests ====================

fn emit(outcome: &CheckOutcome, output: &OutputOptions) -> (u8, String) {
    let mut out = Vec::new();
    let status = outcome.emit(output, &mut out).expect("emit should succeed");
    (status, String::from_utf8(out).unwrap())
}

#[test]
fn test_fail_on_issues_sets_exit_status() {
    let (_fixture, outcome) = run_fixture();

    assert_eq!(outcome.exit_status(true), EXIT_ISSUES);
    assert_eq!(outcome.exit_status(false), EXIT_SUCCESS);

    let output = OutputOptions {
        fail_on_issues: true,
        ..OutputOptions::default()
    };
    assert_eq!(emit(&outcome, &output).0, EXIT_ISSUES);
}

#[test]
fn test_clean_tree_succeeds_with_fail_on_issues() {
    let fixture = create_fixture();
    let root = &fixture.options.translation_folder;
    fs::remove_dir_all(root.join("de")).unwrap();
    fs::write(
        fixture.options.manifest_path(),
        r#""Languages" { "en" "English" "fr" "French" }"#,
    )
    .unwrap();

    let outcome = check::run(&fixture.options).unwrap();
    assert!(outcome.reconciliation.is_clean());
    assert_eq!(outcome.exit_status(true), EXIT_SUCCESS);
}

#[test]
fn test_emit_text_by_default() {
    let (_fixture, outcome) = run_fixture();
    let (status, text) = emit(&outcome, &OutputOptions::default());

    assert_eq!(status, EXIT_SUCCESS);
    assert_eq!(text, outcome.to_text());
    assert!(text.contains("Goodbye"));
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_err());
}

#[test]
fn test_emit_json() {
    let (_fixture, outcome) = run_fixture();
    let output = OutputOptions {
        json: true,
        ..OutputOptions::default()
    };
    let (_, text) = emit(&outcome, &output);

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["summary"]["languages_with_issues"], 2);
    assert_eq!(json["reports"]["languages"].as_array().unwrap().len(), 3);
}

#[test]
fn test_emit_writes_markdown_to_output_dir() {
    let (fixture, outcome) = run_fixture();
    let out_dir = fixture.options.config_folder.with_file_name("out");
    let output = OutputOptions {
        output_dir: Some(out_dir.clone()),
        link_base: "https://example.com".to_string(),
        ..OutputOptions::default()
    };
    emit(&outcome, &output);

    for id in ["de", "fr", "es"] {
        assert!(out_dir.join(format!("{}.md", id)).is_file());
    }
    let es = fs::read_to_string(out_dir.join("es.md")).unwrap();
    assert!(es.contains("https://example.com/es/common.phrases.txt"));
}

// ==================== Fatal Error Tests ====================

#[test]
fn test_missing_translation_folder_is_fatal() {
    let fixture = create_fixture();
    let options = CheckOptions {
        config_folder: fixture.options.config_folder.clone(),
        translation_folder: fixture.options.translation_folder.join("nope"),
    };

    let err = check::run(&options).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_missing_manifest_is_fatal() {
    let fixture = create_fixture();
    fs::remove_file(fixture.options.manifest_path()).unwrap();

    assert!(check::run(&fixture.options).is_err());
}

#[test]
fn test_manifest_without_english_is_fatal() {
    let fixture = create_fixture();
    fs::write(
        fixture.options.manifest_path(),
        r#""Languages" { "de" "German" }"#,
    )
    .unwrap();

    let err = check::run(&fixture.options).unwrap_err();
    assert!(err.to_string().contains("baseline language"));
}
