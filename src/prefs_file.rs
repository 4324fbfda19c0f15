//! Reading and writing `user.js` preference files
//!
//! A profile's preferences are stored one statement per line:
//!
//! ```text
//! user_pref("browser.startup.homepage", "about:blank");
//! user_pref("app.update.enabled", false);
//! user_pref("extensions.enabledScopes", 5);
//! ```
//!
//! Strings are double-quoted with JavaScript-style escapes; booleans and
//! numbers are bare. When reading, a quoted value is always a string, so
//! numeric-looking strings such as `"007"` survive a round trip.
//!
//! # Example
//!
//! ```rust
//! use ffprofile::{parse_user_prefs, serialize_preferences, PrefValue, Preferences};
//!
//! let mut prefs = Preferences::new();
//! prefs.insert("browser.startup.homepage".into(), "about:blank".into());
//! prefs.insert("app.update.enabled".into(), false.into());
//!
//! let text = serialize_preferences(&prefs)?;
//! assert_eq!(
//!     text,
//!     "user_pref(\"app.update.enabled\", false);\n\
//!      user_pref(\"browser.startup.homepage\", \"about:blank\");\n"
//! );
//! assert_eq!(parse_user_prefs(&text)?, prefs);
//! # Ok::<(), ffprofile::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{PrefValue, Preferences};
use std::fmt::Write as _;
use std::path::Path;

/// Name of the preference file inside a profile directory
pub const USER_PREFS_FILE: &str = "user.js";

/// Render a preference table in `user.js` format, sorted by key
///
/// Fails with [`Error::InvalidPreference`] on a NaN or infinite float, which
/// has no `user.js` literal.
pub fn serialize_preferences(prefs: &Preferences) -> Result<String> {
    let mut out = String::new();
    for (key, value) in prefs {
        if !value.is_representable() {
            return Err(Error::InvalidPreference {
                key: key.clone(),
                message: format!("{} is not a finite number", value),
            });
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "user_pref(\"{}\", {});", escape(key), value);
    }
    Ok(out)
}

/// Serialize `prefs` and write them to `path`, replacing any existing file
///
/// Nothing is written when serialization fails.
pub fn write_preferences(path: &Path, prefs: &Preferences) -> Result<()> {
    let content = serialize_preferences(prefs)?;
    std::fs::write(path, content).map_err(|source| Error::PreferenceWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `user.js` content back into a preference table
///
/// Blank lines and `//` comment lines are skipped. Every other line must hold
/// one `user_pref("key", value);` statement. A key that appears twice keeps
/// its last value.
pub fn parse_user_prefs(content: &str) -> Result<Preferences> {
    let mut prefs = Preferences::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let (key, value) = Statement::new(line, index + 1).parse()?;
        prefs.insert(key, value);
    }
    Ok(prefs)
}

/// Read and parse a `user.js` file
pub fn parse_user_prefs_file(path: &Path) -> Result<Preferences> {
    let content = std::fs::read_to_string(path)?;
    parse_user_prefs(&content)
}

/// Escape a string for use inside a double-quoted `user.js` literal
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Undo [`escape`]; returns the offending character on an unknown escape
pub(crate) fn unescape(s: &str) -> std::result::Result<String, char> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(other),
            None => return Err('\\'),
        }
    }
    Ok(out)
}

/// Parse text that must be exactly one double-quoted string literal
pub(crate) fn parse_quoted(literal: &str) -> Result<String> {
    let mut statement = Statement::new(literal, 1);
    let value = statement.quoted()?;
    if !statement.rest().is_empty() {
        return Err(statement.error(format!("Unexpected trailing text '{}'", statement.rest())));
    }
    Ok(value)
}

/// Cursor over a single `user_pref(...)` statement
struct Statement<'a> {
    text: &'a str,
    line: usize,
    /// Byte offset into `text`
    pos: usize,
}

impl<'a> Statement<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Statement { text, line, pos: 0 }
    }

    fn parse(mut self) -> Result<(String, PrefValue)> {
        self.skip_whitespace();
        self.expect("user_pref")?;
        self.skip_whitespace();
        self.expect("(")?;
        self.skip_whitespace();
        let key = self.quoted()?;
        self.skip_whitespace();
        self.expect(",")?;
        self.skip_whitespace();
        let value = self.value()?;
        self.skip_whitespace();
        self.expect(")")?;
        self.skip_whitespace();
        self.expect(";")?;
        self.skip_whitespace();

        let rest = self.rest();
        if !rest.is_empty() && !rest.starts_with("//") {
            return Err(self.error(format!("Unexpected trailing text '{}'", rest)));
        }
        Ok((key, value))
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(format!("Expected '{}'", token)))
        }
    }

    /// Parse a double-quoted string literal
    fn quoted(&mut self) -> Result<String> {
        if !self.rest().starts_with('"') {
            return Err(self.error("Expected string literal".to_string()));
        }
        let start = self.pos + 1;
        let mut escaped = false;
        for (offset, c) in self.text[start..].char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    let body = &self.text[start..start + offset];
                    let unescaped = unescape(body).map_err(|bad| {
                        self.error(format!("Invalid escape sequence '\\{}'", bad))
                    })?;
                    self.pos = start + offset + 1;
                    return Ok(unescaped);
                }
                _ => {}
            }
        }
        Err(self.error("Unterminated string literal".to_string()))
    }

    fn value(&mut self) -> Result<PrefValue> {
        if self.rest().starts_with('"') {
            return self.quoted().map(PrefValue::String);
        }
        let bare_len = self.rest().find(')').unwrap_or(self.rest().len());
        let bare = self.rest()[..bare_len].trim();
        if bare.is_empty() {
            return Err(self.error("Expected value".to_string()));
        }
        let value = PrefValue::from_literal(bare);
        self.pos += bare_len;
        Ok(value)
    }

    fn error(&self, message: String) -> Error {
        Error::Parser {
            line: self.line,
            column: self.text[..self.pos].chars().count() + 1,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Preferences {
        let mut prefs = Preferences::new();
        prefs.insert("browser.startup.homepage".into(), "about:blank".into());
        prefs.insert("app.update.enabled".into(), false.into());
        prefs.insert("extensions.enabledScopes".into(), PrefValue::Integer(5));
        prefs.insert("layout.css.devPixelsPerPx".into(), PrefValue::Float(1.5));
        prefs.insert("test.agent.id".into(), "007".into());
        prefs.insert("test.looks.bool".into(), "true".into());
        prefs.insert("test.escapes".into(), "C:\\dir\\\"quoted\"\n\tnext".into());
        prefs
    }

    #[test]
    fn test_serialize_one_line_per_key() {
        let text = serialize_preferences(&sample()).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().all(|l| l.starts_with("user_pref(\"") && l.ends_with(");")));
        assert!(text.contains("user_pref(\"extensions.enabledScopes\", 5);\n"));
        assert!(text.contains("user_pref(\"app.update.enabled\", false);\n"));
        assert!(text.contains("user_pref(\"test.agent.id\", \"007\");\n"));
    }

    #[test]
    fn test_round_trip_keeps_types() {
        let prefs = sample();
        let parsed = parse_user_prefs(&serialize_preferences(&prefs).unwrap()).unwrap();
        assert_eq!(parsed, prefs);
        assert_eq!(parsed["test.agent.id"], PrefValue::String("007".into()));
        assert_eq!(parsed["test.looks.bool"], PrefValue::String("true".into()));
    }

    #[test]
    fn test_integral_float_stays_float() {
        let mut prefs = Preferences::new();
        prefs.insert("zoom".into(), PrefValue::Float(2.0));
        let text = serialize_preferences(&prefs).unwrap();
        assert_eq!(text, "user_pref(\"zoom\", 2.0);\n");
        assert_eq!(parse_user_prefs(&text).unwrap()["zoom"], PrefValue::Float(2.0));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut prefs = sample();
            prefs.insert("zoom".into(), PrefValue::Float(bad));
            match serialize_preferences(&prefs) {
                Err(Error::InvalidPreference { key, .. }) => assert_eq!(key, "zoom"),
                other => panic!("Expected InvalidPreference, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_write_rejects_non_finite_float_without_touching_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(USER_PREFS_FILE);
        let mut prefs = Preferences::new();
        prefs.insert("zoom".into(), PrefValue::Float(f64::NAN));

        assert!(matches!(
            write_preferences(&path, &prefs),
            Err(Error::InvalidPreference { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_quoted_requires_single_literal() {
        assert_eq!(parse_quoted(r#""a\"b""#).unwrap(), "a\"b");
        match parse_quoted(r#""a" "b""#) {
            Err(Error::Parser { line, column, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(column, 4);
            }
            other => panic!("Expected parser error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = r#"
            // Generated profile
            user_pref("a", 1);

            user_pref( "b" , true ) ; // trailing comment
        "#;
        let prefs = parse_user_prefs(content).unwrap();
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs["a"], PrefValue::Integer(1));
        assert_eq!(prefs["b"], PrefValue::Bool(true));
    }

    #[test]
    fn test_parse_bare_text_is_string() {
        let prefs = parse_user_prefs("user_pref(\"x\", about:blank);").unwrap();
        assert_eq!(prefs["x"], PrefValue::String("about:blank".into()));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let prefs = parse_user_prefs("user_pref(\"a\", 1);\nuser_pref(\"a\", 2);\n").unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs["a"], PrefValue::Integer(2));
    }

    #[test]
    fn test_parse_errors_report_position() {
        match parse_user_prefs("user_pref(\"a\", 1);\npref(\"b\", 2);") {
            Err(Error::Parser { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
            }
            other => panic!("Expected parser error, got {:?}", other),
        }

        let err = parse_user_prefs("user_pref(\"a\", \"open);").unwrap_err();
        assert!(err.to_string().contains("Unterminated string"));

        let err = parse_user_prefs("user_pref(\"a\", 1)").unwrap_err();
        assert!(err.to_string().contains("Expected ';'"));

        let err = parse_user_prefs(r#"user_pref("a", "\q");"#).unwrap_err();
        assert!(err.to_string().contains("Invalid escape"));

        let err = parse_user_prefs("user_pref(\"a\", );").unwrap_err();
        assert!(err.to_string().contains("Expected value"));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(USER_PREFS_FILE);
        write_preferences(&path, &sample()).unwrap();
        assert_eq!(parse_user_prefs_file(&path).unwrap(), sample());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(USER_PREFS_FILE);
        match write_preferences(&path, &sample()) {
            Err(Error::PreferenceWrite { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected PreferenceWrite, got {:?}", other),
        }
    }
}
