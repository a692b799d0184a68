//! Consistency checker for SourceMod translation files.
//!
//! Every language declared in `languages.cfg` is compared against the English
//! baseline for missing files and phrases, misplaced phrases, stray
//! translations and format parameter mismatches.

pub mod check;
pub mod config;
pub mod i18n;
pub mod keyvalues;
pub mod report;
