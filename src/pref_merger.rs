//! Preference merger
//!
//! This module merges the three preference layers of a profile with fixed
//! precedence:
//!
//! 1. Common defaults (lowest precedence)
//! 2. Browser-specific defaults (medium precedence)
//! 3. Caller overrides (highest precedence)
//!
//! Later layers win on key collision. Merging is pure and infallible.

use crate::defaults;
use crate::types::{BrowserKind, PrefEntry, PrefSource, PrefValue, Preferences};
use std::collections::BTreeMap;

/// Merge three preference layers into the final table
///
/// # Example
///
/// ```rust
/// use ffprofile::{merge_preferences, PrefValue, Preferences};
///
/// let mut common = Preferences::new();
/// common.insert("a".into(), PrefValue::Integer(1));
/// common.insert("b".into(), PrefValue::Integer(1));
/// let mut browser = Preferences::new();
/// browser.insert("b".into(), PrefValue::Integer(2));
/// let mut overrides = Preferences::new();
/// overrides.insert("a".into(), PrefValue::Integer(3));
///
/// let merged = merge_preferences(&common, &browser, &overrides);
/// assert_eq!(merged["a"], PrefValue::Integer(3));
/// assert_eq!(merged["b"], PrefValue::Integer(2));
/// ```
pub fn merge_preferences(
    common: &Preferences,
    browser: &Preferences,
    overrides: &Preferences,
) -> Preferences {
    merge_with_sources(common, browser, overrides)
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect()
}

/// Merge three preference layers, recording which layer supplied each value
///
/// Entries are returned sorted by key.
pub fn merge_with_sources(
    common: &Preferences,
    browser: &Preferences,
    overrides: &Preferences,
) -> Vec<PrefEntry> {
    let layers = [
        (common, PrefSource::CommonDefault),
        (browser, PrefSource::BrowserDefault),
        (overrides, PrefSource::Override),
    ];

    let mut pref_map: BTreeMap<&str, (&PrefValue, PrefSource)> = BTreeMap::new();
    for (layer, source) in layers {
        for (key, value) in layer {
            pref_map.insert(key.as_str(), (value, source));
        }
    }

    pref_map
        .into_iter()
        .map(|(key, (value, source))| PrefEntry {
            key: key.to_string(),
            value: value.clone(),
            source,
        })
        .collect()
}

/// Merge the built-in defaults for `kind` with caller overrides
pub fn merge_default_preferences(kind: BrowserKind, overrides: &Preferences) -> Preferences {
    merge_preferences(
        defaults::common_defaults(),
        defaults::defaults_for(kind),
        overrides,
    )
}

/// Get the merged entry for a preference key
///
/// `prefs` must be sorted by key, as returned by [`merge_with_sources`].
///
/// # Example
///
/// ```rust
/// use ffprofile::{get_effective_pref, merge_with_sources, PrefSource, Preferences};
///
/// let mut overrides = Preferences::new();
/// overrides.insert("test".into(), true.into());
/// let entries = merge_with_sources(&Preferences::new(), &Preferences::new(), &overrides);
///
/// let entry = get_effective_pref(&entries, "test").unwrap();
/// assert_eq!(entry.source, PrefSource::Override);
/// ```
pub fn get_effective_pref<'a>(prefs: &'a [PrefEntry], key: &str) -> Option<&'a PrefEntry> {
    prefs
        .binary_search_by(|entry| entry.key.as_str().cmp(key))
        .ok()
        .map(|index| &prefs[index])
}
