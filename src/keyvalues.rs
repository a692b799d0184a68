//! KeyValues text parser.
//!
//! SourceMod translation files and `languages.cfg` are written in Valve's
//! KeyValues format: nested `"key" "value"` pairs grouped into `{ ... }`
//! sections. This module turns that text into an ordered tree.
//!
//! # Example
//!
//! ```
//! use smtranslate::keyvalues::{self, Value};
//!
//! let doc = keyvalues::parse(r#""Languages" { "en" "English" }"#).unwrap();
//! let languages = doc.get("Languages").and_then(Value::as_section).unwrap();
//! assert_eq!(languages.get("en").and_then(Value::as_str), Some("English"));
//! ```

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::iter::Peekable;
use std::vec::IntoIter;
use thiserror::Error;

/// An ordered KeyValues section.
pub type KeyValues = IndexMap<String, Value>;

/// A node in a KeyValues document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Section(KeyValues),
}

impl Value {
    /// The string payload, if this node is a plain value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Section(_) => None,
        }
    }

    /// The child entries, if this node is a section.
    pub fn as_section(&self) -> Option<&KeyValues> {
        match self {
            Value::Section(section) => Some(section),
            Value::String(_) => None,
        }
    }
}

/// Failure to parse a KeyValues document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quoted string starting at line {line}")]
    UnterminatedString { line: usize },

    #[error("unexpected '{{' at line {line}")]
    UnexpectedOpenBrace { line: usize },

    #[error("unexpected '}}' at line {line}")]
    UnexpectedCloseBrace { line: usize },

    #[error("section \"{key}\" opened at line {line} is never closed")]
    UnclosedSection { key: String, line: usize },

    #[error("key \"{key}\" at line {line} has no value")]
    MissingValue { key: String, line: usize },

    #[error("sections nested deeper than {max} levels at line {line}")]
    TooDeep { max: usize, line: usize },
}

/// Deepest section nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Text(String),
    Open,
    Close,
    Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

/// Parse a KeyValues document into its top-level section.
///
/// A leading UTF-8 byte order mark is ignored.
pub fn parse(input: &str) -> Result<KeyValues, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut tokens = tokenize(input)?.into_iter().peekable();
    parse_section(&mut tokens, None, 0)
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '{' => tokens.push(Token {
                kind: TokenKind::Open,
                line,
            }),
            '}' => tokens.push(Token {
                kind: TokenKind::Close,
                line,
            }),
            '"' => {
                let start = line;
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some('t') => text.push('\t'),
                            Some('r') => text.push('\r'),
                            Some('\\') => text.push('\\'),
                            Some('"') => text.push('"'),
                            Some(other) => {
                                if other == '\n' {
                                    line += 1;
                                }
                                text.push('\\');
                                text.push(other);
                            }
                            None => break,
                        },
                        '\n' => {
                            line += 1;
                            text.push('\n');
                        }
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedString { line: start });
                }
                tokens.push(Token {
                    kind: TokenKind::Text(text),
                    line: start,
                });
            }
            c => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '{' | '}' | '"') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                let kind = if is_condition(&word) {
                    TokenKind::Condition
                } else {
                    TokenKind::Text(word)
                };
                tokens.push(Token { kind, line });
            }
        }
    }

    Ok(tokens)
}

/// Platform conditionals such as `[$WIN32]` or `[!$X360]`.
fn is_condition(word: &str) -> bool {
    word.len() > 2
        && word.ends_with(']')
        && (word.starts_with("[$") || word.starts_with("[!$"))
}

fn skip_conditions(tokens: &mut Peekable<IntoIter<Token>>) {
    while tokens
        .peek()
        .is_some_and(|token| token.kind == TokenKind::Condition)
    {
        tokens.next();
    }
}

fn parse_section(
    tokens: &mut Peekable<IntoIter<Token>>,
    opened: Option<(String, usize)>,
    depth: usize,
) -> Result<KeyValues, ParseError> {
    let mut section = KeyValues::new();

    loop {
        let Some(token) = tokens.next() else {
            return match opened {
                Some((key, line)) => Err(ParseError::UnclosedSection { key, line }),
                None => Ok(section),
            };
        };

        let key = match token.kind {
            TokenKind::Text(key) => key,
            TokenKind::Condition => continue,
            TokenKind::Close => {
                return match opened {
                    Some(_) => Ok(section),
                    None => Err(ParseError::UnexpectedCloseBrace { line: token.line }),
                };
            }
            TokenKind::Open => return Err(ParseError::UnexpectedOpenBrace { line: token.line }),
        };

        skip_conditions(tokens);
        match tokens.next().map(|next| next.kind) {
            Some(TokenKind::Text(value)) => {
                skip_conditions(tokens);
                section.insert(key, Value::String(value));
            }
            Some(TokenKind::Open) => {
                if depth >= MAX_DEPTH {
                    return Err(ParseError::TooDeep {
                        max: MAX_DEPTH,
                        line: token.line,
                    });
                }
                let child = parse_section(tokens, Some((key.clone(), token.line)), depth + 1)?;
                insert_section(&mut section, key, child);
            }
            _ => {
                return Err(ParseError::MissingValue {
                    key,
                    line: token.line,
                })
            }
        }
    }
}

/// Repeated sections merge into the first occurrence.
fn insert_section(section: &mut KeyValues, key: String, child: KeyValues) {
    match section.entry(key) {
        Entry::Occupied(mut existing) => match existing.get_mut() {
            Value::Section(current) => {
                for (child_key, child_value) in child {
                    match child_value {
                        Value::Section(nested) => insert_section(current, child_key, nested),
                        value => {
                            current.insert(child_key, value);
                        }
                    }
                }
            }
            value => *value = Value::Section(child),
        },
        Entry::Vacant(slot) => {
            slot.insert(Value::Section(child));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section<'a>(doc: &'a KeyValues, key: &str) -> &'a KeyValues {
        doc.get(key)
            .and_then(Value::as_section)
            .expect("section should exist")
    }

    // ==================== Basic Parsing Tests ====================

    #[test]
    fn test_parse_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n\t// only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_phrase_file() {
        let doc = parse(
            r##"
"Phrases"
{
    "Welcome"
    {
        "#format"   "{1:s}"
        "en"        "Welcome {1}"
    }
}
"##,
        )
        .unwrap();

        let phrases = section(&doc, "Phrases");
        let welcome = section(phrases, "Welcome");
        assert_eq!(welcome.get("#format").and_then(Value::as_str), Some("{1:s}"));
        assert_eq!(welcome.get("en").and_then(Value::as_str), Some("Welcome {1}"));
    }

    #[test]
    fn test_parse_skips_byte_order_mark() {
        let doc = parse("\u{feff}\"Phrases\"\n{\n    \"Hello\" { \"en\" \"Hello\" }\n}").unwrap();
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["Phrases"]);

        // Only a leading mark is skipped
        let doc = parse("\"k\" \"\u{feff}v\"").unwrap();
        assert_eq!(doc.get("k").and_then(Value::as_str), Some("\u{feff}v"));
    }

    #[test]
    fn test_parse_preserves_order() {
        let doc = parse(r#""s" { "b" "1" "a" "2" "c" "3" }"#).unwrap();
        let keys: Vec<_> = section(&doc, "s").keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_unquoted_tokens() {
        let doc = parse("Languages\n{\n  en English\n  de \"German\"\n}").unwrap();
        let languages = section(&doc, "Languages");
        assert_eq!(languages.get("en").and_then(Value::as_str), Some("English"));
        assert_eq!(languages.get("de").and_then(Value::as_str), Some("German"));
    }

    #[test]
    fn test_parse_escapes() {
        let doc = parse(r#""k" "line\none \"quoted\" back\\slash \x""#).unwrap();
        assert_eq!(
            doc.get("k").and_then(Value::as_str),
            Some("line\none \"quoted\" back\\slash \\x")
        );
    }

    #[test]
    fn test_parse_multiline_string() {
        let doc = parse("\"k\" \"first\nsecond\"\n\"next\" \"v\"").unwrap();
        assert_eq!(doc.get("k").and_then(Value::as_str), Some("first\nsecond"));
        assert_eq!(doc.get("next").and_then(Value::as_str), Some("v"));
    }

    #[test]
    fn test_parse_comments_and_conditions() {
        let doc = parse(
            r##"
// header comment
"s" [$WIN32]
{
    "a" "1" [!$X360] // trailing
    "url" "http://example.com"
}
"##,
        )
        .unwrap();
        let s = section(&doc, "s");
        assert_eq!(s.get("a").and_then(Value::as_str), Some("1"));
        assert_eq!(
            s.get("url").and_then(Value::as_str),
            Some("http://example.com")
        );
    }

    // ==================== Duplicate Key Tests ====================

    #[test]
    fn test_duplicate_value_overwrites_in_place() {
        let doc = parse(r#""s" { "a" "1" "b" "2" "a" "3" }"#).unwrap();
        let s = section(&doc, "s");
        let entries: Vec<_> = s
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap()))
            .collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_duplicate_sections_merge() {
        let doc = parse(r#""s" { "a" "1" } "s" { "b" "2" }"#).unwrap();
        let s = section(&doc, "s");
        assert_eq!(s.len(), 2);
        assert_eq!(s.get("b").and_then(Value::as_str), Some("2"));
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_unterminated_string() {
        let err = parse("\"s\"\n{\n \"a\" \"oops\n").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedString { line: 3 });
    }

    #[test]
    fn test_unclosed_section() {
        let err = parse("\"Phrases\"\n{\n \"a\" \"1\"\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnclosedSection {
                key: "Phrases".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_unexpected_close_brace() {
        let err = parse("\"a\" \"1\"\n}").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedCloseBrace { line: 2 });
    }

    #[test]
    fn test_unexpected_open_brace() {
        let err = parse("{ \"a\" \"1\" }").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedOpenBrace { line: 1 });
    }

    #[test]
    fn test_missing_value() {
        let err = parse("\"s\" { \"a\" }").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingValue {
                key: "a".to_string(),
                line: 1
            }
        );
        assert!(parse("\"lonely\"").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| "\"a\" {".repeat(depth) + &"}".repeat(depth);

        assert!(parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            parse(&nested(MAX_DEPTH + 1)).unwrap_err(),
            ParseError::TooDeep {
                max: MAX_DEPTH,
                line: 1
            }
        );
        // Far past the limit still fails cleanly instead of overflowing the stack
        assert!(matches!(
            parse(&nested(100_000)),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::UnclosedSection {
            key: "Phrases".to_string(),
            line: 4,
        };
        assert_eq!(
            err.to_string(),
            "section \"Phrases\" opened at line 4 is never closed"
        );
    }
}
