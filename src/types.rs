use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A preference table keyed by dotted preference name
///
/// Sorted by key so serialization order is deterministic.
pub type Preferences = BTreeMap<String, PrefValue>;

/// Typed preference value
///
/// The variant is fixed when the value is constructed and never re-inferred
/// from string content, so `PrefValue::String("007".into())` stays a string.
///
/// Deserializes from JSON by JSON type: booleans, integers, floats and
/// strings map to the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PrefValue {
    /// Type a literal the way `user.js` values are read
    ///
    /// Tries a boolean literal, then an integer, then a float; a
    /// double-quoted literal is a string with escapes processed. A malformed
    /// quoted literal or anything else is kept verbatim as a string.
    ///
    /// ```rust
    /// use ffprofile::PrefValue;
    ///
    /// assert_eq!(PrefValue::from_literal("false"), PrefValue::Bool(false));
    /// assert_eq!(PrefValue::from_literal("42"), PrefValue::Integer(42));
    /// assert_eq!(PrefValue::from_literal("\"007\""), PrefValue::String("007".into()));
    /// assert_eq!(PrefValue::from_literal("about:blank"), PrefValue::String("about:blank".into()));
    /// ```
    pub fn from_literal(text: &str) -> Self {
        let text = text.trim();
        Self::parse_literal(text).unwrap_or_else(|_| PrefValue::String(text.to_string()))
    }

    /// Like [`PrefValue::from_literal`], but a literal starting with `"` must
    /// be exactly one well-formed string literal
    ///
    /// ```rust
    /// use ffprofile::PrefValue;
    ///
    /// assert_eq!(
    ///     PrefValue::parse_literal(r#""say \"hi\"""#)?,
    ///     PrefValue::String("say \"hi\"".into())
    /// );
    /// assert!(PrefValue::parse_literal(r#""a" "b""#).is_err());
    /// # Ok::<(), ffprofile::Error>(())
    /// ```
    pub fn parse_literal(text: &str) -> Result<Self, Error> {
        let text = text.trim();
        if text.starts_with('"') {
            return crate::prefs_file::parse_quoted(text).map(PrefValue::String);
        }
        Ok(Self::from_bare(text))
    }

    fn from_bare(text: &str) -> Self {
        match text {
            "true" => return PrefValue::Bool(true),
            "false" => return PrefValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = text.parse::<i64>() {
            return PrefValue::Integer(n);
        }
        let numeric_start = text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if numeric_start {
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    return PrefValue::Float(f);
                }
            }
        }
        PrefValue::String(text.to_string())
    }

    /// False for NaN and infinite floats, which `user.js` cannot represent
    pub fn is_representable(&self) -> bool {
        match self {
            PrefValue::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as f64 (integers are widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Integer(n) => Some(*n as f64),
            PrefValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, PrefValue::Integer(_) | PrefValue::Float(_))
    }
}

/// Renders the value as it appears in `user.js`
impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(n) => write!(f, "{}", n),
            // Debug keeps a fractional part or exponent, so 2.0 stays a float
            PrefValue::Float(x) => write!(f, "{:?}", x),
            PrefValue::String(s) => write!(f, "\"{}\"", crate::prefs_file::escape(s)),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Integer(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Integer(value.into())
    }
}

impl From<f64> for PrefValue {
    fn from(value: f64) -> Self {
        PrefValue::Float(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

/// Layer of the merge that supplied a preference's final value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefSource {
    /// Defaults shared by every browser kind
    CommonDefault,
    /// Defaults specific to the selected browser kind
    BrowserDefault,
    /// Caller-supplied override
    Override,
}

/// A merged preference together with the layer it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    pub source: PrefSource,
}

/// Browser whose built-in defaults are merged into a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Firefox,
    Thunderbird,
    /// Firefox for Android
    Fennec,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 3] = [
        BrowserKind::Firefox,
        BrowserKind::Thunderbird,
        BrowserKind::Fennec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Firefox => "firefox",
            BrowserKind::Thunderbird => "thunderbird",
            BrowserKind::Fennec => "fennec",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrowserKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownBrowserKind(s.to_string()))
    }
}
