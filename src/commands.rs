use anyhow::Context;
use ffprofile::{
    common_defaults, create_profile, defaults_for, merge_preferences, merge_with_sources,
    parse_user_prefs_file, query_preferences, BrowserKind, PrefEntry, PrefValue, Preferences,
    ProfileConfig, USER_PREFS_FILE,
};
use std::path::{Path, PathBuf};

/// Arguments of the `create` subcommand
pub struct CreateArgs {
    pub browser: Option<BrowserKind>,
    pub addon: Option<PathBuf>,
    pub prefs: Vec<(String, PrefValue)>,
    pub config: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub json: bool,
}

/// Create a profile and print its path (or the full profile as JSON)
pub fn create(args: CreateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProfileConfig::default(),
    };

    if let Some(browser) = args.browser {
        config.browser_kind = browser;
    }
    if let Some(addon) = args.addon {
        config.addon_source = Some(addon);
    }
    if let Some(dir) = args.dir {
        config.parent_dir = Some(dir);
    }
    config.override_preferences.extend(args.prefs);

    let profile = create_profile(&config).context("Failed to create profile")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", profile.path.display());
    }
    Ok(())
}

/// Print the merged built-in defaults for a browser
pub fn show_defaults(browser: BrowserKind, query: &[String], sources: bool) -> anyhow::Result<()> {
    let patterns: Vec<&str> = query.iter().map(String::as_str).collect();

    let json = if sources {
        let mut entries =
            merge_with_sources(common_defaults(), defaults_for(browser), &Preferences::new());
        if !patterns.is_empty() {
            let keep = apply_query(&to_table(&entries), &patterns)?;
            entries.retain(|entry| keep.contains_key(&entry.key));
        }
        serde_json::to_string_pretty(&entries)?
    } else {
        let merged =
            merge_preferences(common_defaults(), defaults_for(browser), &Preferences::new());
        serde_json::to_string_pretty(&apply_query(&merged, &patterns)?)?
    };

    println!("{}", json);
    Ok(())
}

/// Parse a profile's user.js and print it
pub fn show_profile(profile: &Path, query: &[String]) -> anyhow::Result<()> {
    let prefs_path = profile.join(USER_PREFS_FILE);
    let prefs = parse_user_prefs_file(&prefs_path).with_context(|| {
        format!(
            "Failed to read {}. Make sure the directory is a profile created by ffprofile.",
            prefs_path.display()
        )
    })?;

    let patterns: Vec<&str> = query.iter().map(String::as_str).collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&apply_query(&prefs, &patterns)?)?
    );
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ProfileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn apply_query(prefs: &Preferences, patterns: &[&str]) -> anyhow::Result<Preferences> {
    if patterns.is_empty() {
        return Ok(prefs.clone());
    }
    query_preferences(prefs, patterns).context("Failed to apply query")
}

fn to_table(entries: &[PrefEntry]) -> Preferences {
    entries
        .iter()
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("profile.json"));
    }

    #[test]
    fn test_apply_query_without_patterns_keeps_everything() {
        let prefs = merge_with_sources(common_defaults(), &Preferences::new(), &Preferences::new());
        let table = to_table(&prefs);
        assert_eq!(apply_query(&table, &[]).unwrap(), table);
    }

    #[test]
    fn test_create_applies_flags_over_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("profile.json");
        std::fs::write(
            &config_path,
            r#"{"browser_kind": "fennec", "override_preferences": {"x.y": 1, "x.z": "keep"}}"#,
        )
        .unwrap();

        create(CreateArgs {
            browser: Some(BrowserKind::Thunderbird),
            addon: None,
            prefs: vec![("x.y".to_string(), PrefValue::Integer(2))],
            config: Some(config_path),
            dir: Some(dir.path().to_path_buf()),
            json: false,
        })
        .unwrap();

        let profile_dir = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.path().is_dir())
            .unwrap()
            .path();
        let prefs = parse_user_prefs_file(&profile_dir.join(USER_PREFS_FILE)).unwrap();
        assert_eq!(prefs["x.y"], PrefValue::Integer(2));
        assert_eq!(prefs["x.z"], PrefValue::String("keep".to_string()));
        assert!(prefs.contains_key("mail.shell.checkDefaultClient"));
    }
}
