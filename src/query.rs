use crate::error::{Error, Result};
use crate::types::Preferences;
use glob::Pattern;

/// Query preferences by glob patterns (OR logic)
/// Returns preferences whose key matches any of the provided patterns
pub fn query_preferences(preferences: &Preferences, patterns: &[&str]) -> Result<Preferences> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let queried: Preferences = preferences
        .iter()
        .filter(|(key, _)| compiled_patterns.iter().any(|pattern| pattern.matches(key)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(queried)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValue;

    fn create_test_prefs() -> Preferences {
        let mut prefs = Preferences::new();
        prefs.insert("extensions.update.enabled".to_string(), PrefValue::Bool(false));
        prefs.insert("extensions.enabledScopes".to_string(), PrefValue::Integer(5));
        prefs.insert(
            "browser.startup.homepage".to_string(),
            PrefValue::String("about:blank".to_string()),
        );
        prefs.insert("browser.tabs.warnOnClose".to_string(), PrefValue::Bool(false));
        prefs.insert("app.update.enabled".to_string(), PrefValue::Bool(false));
        prefs
    }

    #[test]
    fn test_query_single_pattern() {
        let prefs = create_test_prefs();
        let queried = query_preferences(&prefs, &["extensions.*"]).unwrap();
        assert_eq!(queried.len(), 2);
        assert!(queried.contains_key("extensions.update.enabled"));
        assert!(queried.contains_key("extensions.enabledScopes"));
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let prefs = create_test_prefs();
        let queried = query_preferences(&prefs, &["extensions.*", "app.update.enabled"]).unwrap();
        assert_eq!(queried.len(), 3);
        assert!(queried.contains_key("app.update.enabled"));
    }

    #[test]
    fn test_query_wildcard_in_middle() {
        let prefs = create_test_prefs();
        let queried = query_preferences(&prefs, &["*.update.enabled"]).unwrap();
        assert_eq!(queried.len(), 2);
    }

    #[test]
    fn test_query_no_matches() {
        let prefs = create_test_prefs();
        let queried = query_preferences(&prefs, &["nonexistent.*"]).unwrap();
        assert!(queried.is_empty());
    }

    #[test]
    fn test_query_invalid_pattern() {
        let prefs = create_test_prefs();
        let result = query_preferences(&prefs, &["[invalid"]);
        assert!(matches!(result, Err(Error::InvalidGlobPattern(_))));
    }
}
