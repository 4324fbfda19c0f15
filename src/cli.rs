use clap::{Parser, Subcommand};
use ffprofile::{BrowserKind, PrefValue};
use std::path::PathBuf;

/// CLI arguments for ffprofile
#[derive(Parser, Debug)]
#[command(name = "ffprofile")]
#[command(about = "Build disposable Firefox profiles for automated testing")]
#[command(version)]
pub struct Cli {
    /// Log each step to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new profile and print its path
    Create {
        /// Browser whose defaults to merge: firefox, thunderbird, or fennec
        #[arg(short, long)]
        browser: Option<BrowserKind>,

        /// Packed (.xpi/.zip) or unpacked addon to install
        #[arg(short, long)]
        addon: Option<PathBuf>,

        /// Override a preference, e.g. --pref browser.startup.page=1
        #[arg(short, long = "pref", value_name = "KEY=VALUE", value_parser = parse_pref_assignment)]
        prefs: Vec<(String, PrefValue)>,

        /// JSON profile configuration; flags given on the command line win
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory to create the profile in (default: system temp dir)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Print the whole profile as JSON instead of just its path
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in default preferences as JSON
    Defaults {
        #[arg(short, long, default_value = "firefox")]
        browser: BrowserKind,

        /// Only show keys matching a glob pattern (repeatable, OR logic)
        #[arg(short, long, value_name = "GLOB")]
        query: Vec<String>,

        /// Include which default table each value comes from
        #[arg(long)]
        sources: bool,
    },

    /// Parse an existing profile's user.js and print it as JSON
    Show {
        /// Profile directory
        profile: PathBuf,

        /// Only show keys matching a glob pattern (repeatable, OR logic)
        #[arg(short, long, value_name = "GLOB")]
        query: Vec<String>,
    },
}

/// Parse `KEY=VALUE`, typing the value like a user.js literal
pub fn parse_pref_assignment(s: &str) -> Result<(String, PrefValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty preference name in '{}'", s));
    }
    let value =
        PrefValue::parse_literal(value).map_err(|e| format!("bad value in '{}': {}", s, e))?;
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pref_assignment() {
        assert_eq!(
            parse_pref_assignment("browser.startup.page=1").unwrap(),
            ("browser.startup.page".to_string(), PrefValue::Integer(1))
        );
        assert_eq!(
            parse_pref_assignment("a=b=c").unwrap(),
            ("a".to_string(), PrefValue::String("b=c".to_string()))
        );
        assert_eq!(
            parse_pref_assignment("id=\"007\"").unwrap(),
            ("id".to_string(), PrefValue::String("007".to_string()))
        );
        assert!(parse_pref_assignment("novalue").is_err());
        assert!(parse_pref_assignment(r#"id="a" "b""#).is_err());
        assert!(parse_pref_assignment("id=\"open").is_err());
        assert!(parse_pref_assignment("=1").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "ffprofile",
            "create",
            "--browser",
            "thunderbird",
            "--pref",
            "a.b=true",
            "-p",
            "c.d=2.5",
            "--addon",
            "x.xpi",
        ])
        .unwrap();

        match cli.command {
            Commands::Create {
                browser,
                addon,
                prefs,
                json,
                ..
            } => {
                assert_eq!(browser, Some(BrowserKind::Thunderbird));
                assert_eq!(addon, Some(PathBuf::from("x.xpi")));
                assert_eq!(prefs.len(), 2);
                assert_eq!(prefs[1].1, PrefValue::Float(2.5));
                assert!(!json);
            }
            other => panic!("Expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_browser() {
        assert!(Cli::try_parse_from(["ffprofile", "defaults", "--browser", "chrome"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
