//! # ffprofile - disposable Firefox profiles for automated testing
//!
//! This library builds throwaway browser profile directories: it merges the
//! built-in default preferences with caller overrides, writes them to
//! `user.js`, and optionally installs one addon into the profile's
//! `extensions` directory.
//!
//! ## Features
//!
//! - Deterministic preference merging: common defaults < browser defaults < overrides
//! - Built-in default tables for Firefox, Thunderbird, and Fennec
//! - Explicitly typed preference values (a `"007"` string never turns into a number)
//! - Packed (`.xpi`) addons installed verbatim, unpacked addon directories copied
//! - Read a generated `user.js` back and query it with glob patterns
//!
//! ## Quick Start
//!
//! ### Building a Profile
//!
//! ```rust,no_run
//! use ffprofile::{create_profile, BrowserKind, ProfileConfig};
//!
//! let config = ProfileConfig::new()
//!     .browser(BrowserKind::Firefox)
//!     .set_pref("browser.startup.homepage", "https://example.com")
//!     .addon("tests/addons/@simple-addon.xpi");
//!
//! let profile = create_profile(&config)?;
//! println!("Profile at {}", profile.path.display());
//! println!("Addon installed at {:?}", profile.addon_path());
//! # Ok::<(), ffprofile::Error>(())
//! ```
//!
//! ### Merging Preferences
//!
//! ```rust
//! use ffprofile::{common_defaults, defaults_for, merge_preferences, BrowserKind, PrefValue, Preferences};
//!
//! let mut overrides = Preferences::new();
//! overrides.insert("app.update.enabled".into(), true.into());
//!
//! let merged = merge_preferences(
//!     common_defaults(),
//!     defaults_for(BrowserKind::Firefox),
//!     &overrides,
//! );
//! assert_eq!(merged["app.update.enabled"], PrefValue::Bool(true));
//! assert_eq!(merged["browser.warnOnQuit"], PrefValue::Bool(false));
//! ```
//!
//! ### Installing an Addon Directly
//!
//! ```rust,no_run
//! use ffprofile::AddonInstaller;
//! use std::path::Path;
//!
//! let installed = AddonInstaller::new().install(
//!     Path::new("addons/@unpacked-addon"),
//!     Path::new("/tmp/profile/extensions"),
//! )?;
//! assert!(installed.ends_with("@unpacked-addon"));
//! # Ok::<(), ffprofile::Error>(())
//! ```
//!
//! ### Reading a Profile Back
//!
//! ```rust
//! use ffprofile::{parse_user_prefs, query_preferences};
//!
//! let content = r#"
//!     user_pref("extensions.update.enabled", false);
//!     user_pref("extensions.enabledScopes", 5);
//!     user_pref("browser.startup.homepage", "about:blank");
//! "#;
//!
//! let prefs = parse_user_prefs(content)?;
//! let extension_prefs = query_preferences(&prefs, &["extensions.*"])?;
//! assert_eq!(extension_prefs.len(), 2);
//! # Ok::<(), ffprofile::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible functions return [`Result<T, Error>`]. Every variant carries
//! the path involved:
//!
//! ```rust
//! use ffprofile::{AddonInstaller, Error};
//! use std::path::Path;
//!
//! match AddonInstaller::new().install(Path::new("no/such/addon.xpi"), Path::new("/tmp/ext")) {
//!     Err(Error::AddonNotFound(path)) => eprintln!("No addon at {}", path.display()),
//!     Err(e) => eprintln!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Logging
//!
//! The library reports progress through [`tracing`] events; install a
//! subscriber to see them.

// Re-export all public types at crate root
pub use types::{BrowserKind, PrefEntry, PrefSource, PrefValue, Preferences};

// Re-export error types
pub use error::{Error, Result};

// Re-export defaults and merging
pub use defaults::{browser_defaults, common_defaults, defaults_for};
pub use pref_merger::{
    get_effective_pref, merge_default_preferences, merge_preferences, merge_with_sources,
};

// Re-export the preference file codec
pub use prefs_file::{
    parse_user_prefs, parse_user_prefs_file, serialize_preferences, write_preferences,
    USER_PREFS_FILE,
};

// Re-export addon installation
pub use addon::{
    classify, Addon, AddonFs, AddonInstaller, InstallType, SourceKind, StdFs, ARCHIVE_EXTENSIONS,
};

// Re-export profile assembly
pub use profile::{
    create_profile, Profile, ProfileBuilder, ProfileConfig, EXTENSIONS_DIR, PROFILE_PREFIX,
};

pub use query::query_preferences;

// All modules are private - use re-exports above for public API
mod addon;
mod defaults;
mod error;
mod pref_merger;
mod prefs_file;
mod profile;
mod query;
mod types;
