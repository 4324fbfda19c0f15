//! Profile assembly
//!
//! [`ProfileBuilder::create`] allocates a fresh profile directory, writes the
//! merged preferences to `user.js`, and installs the configured addon:
//!
//! ```text
//! <profile-root>/
//!   user.js
//!   extensions/
//!     <addon-id>/ or <addon-file>.xpi
//! ```
//!
//! Steps run in order and the first failure fails the whole call. The
//! directory is never removed by this crate, even on failure; cleaning up is
//! the caller's job.

use crate::addon::{Addon, AddonFs, AddonInstaller, StdFs};
use crate::defaults;
use crate::error::{Error, Result};
use crate::pref_merger::merge_preferences;
use crate::prefs_file::{parse_user_prefs_file, write_preferences, USER_PREFS_FILE};
use crate::types::{BrowserKind, PrefValue, Preferences};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of every allocated profile directory name
pub const PROFILE_PREFIX: &str = "ffprofile-";

/// Extensions directory inside a profile
pub const EXTENSIONS_DIR: &str = "extensions";

/// Options for building a profile
///
/// Every field is optional; `ProfileConfig::default()` builds a plain Firefox
/// profile in the system temp directory.
///
/// # Example
///
/// ```rust
/// use ffprofile::{BrowserKind, ProfileConfig};
///
/// let config = ProfileConfig::new()
///     .browser(BrowserKind::Thunderbird)
///     .set_pref("mail.shell.checkDefaultClient", true)
///     .addon("addons/@simple-addon.xpi");
///
/// assert_eq!(config.override_preferences.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Merged last, winning over every built-in default
    pub override_preferences: Preferences,
    /// Selects the browser-specific default table
    pub browser_kind: BrowserKind,
    /// Packed archive or unpacked directory to install
    pub addon_source: Option<PathBuf>,
    /// Directory to allocate the profile in (system temp dir when unset)
    pub parent_dir: Option<PathBuf>,
}

impl ProfileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn browser(mut self, kind: BrowserKind) -> Self {
        self.browser_kind = kind;
        self
    }

    /// Override a single preference
    pub fn set_pref(mut self, key: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        self.override_preferences.insert(key.into(), value.into());
        self
    }

    /// Override several preferences; later calls win over earlier ones
    pub fn prefs(mut self, prefs: Preferences) -> Self {
        self.override_preferences.extend(prefs);
        self
    }

    pub fn addon(mut self, source: impl Into<PathBuf>) -> Self {
        self.addon_source = Some(source.into());
        self
    }

    pub fn parent_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parent_dir = Some(dir.into());
        self
    }
}

/// A profile directory produced by [`ProfileBuilder::create`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub path: PathBuf,
    /// Exactly what was written to `user.js`
    pub preferences: Preferences,
    pub addon: Option<Addon>,
}

impl Profile {
    pub fn prefs_path(&self) -> PathBuf {
        self.path.join(USER_PREFS_FILE)
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.path.join(EXTENSIONS_DIR)
    }

    /// Where the addon was installed, if there is one
    pub fn addon_path(&self) -> Option<PathBuf> {
        self.addon
            .as_ref()
            .map(|addon| self.extensions_dir().join(addon.install_name()))
    }

    /// Parse the profile's `user.js` back from disk
    pub fn read_preferences(&self) -> Result<Preferences> {
        parse_user_prefs_file(&self.prefs_path())
    }
}

/// Builds profile directories
///
/// Holds no per-call state, so one builder can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder<F: AddonFs = StdFs> {
    installer: AddonInstaller<F>,
}

impl ProfileBuilder<StdFs> {
    pub fn new() -> Self {
        Self::with_installer(AddonInstaller::new())
    }
}

impl<F: AddonFs> ProfileBuilder<F> {
    pub fn with_installer(installer: AddonInstaller<F>) -> Self {
        ProfileBuilder { installer }
    }

    /// Build a new profile from `config`
    ///
    /// # Errors
    ///
    /// - [`Error::ProfileAllocation`] if the directory cannot be created
    /// - [`Error::InvalidPreference`] if an override is a NaN or infinite float
    /// - [`Error::PreferenceWrite`] if `user.js` cannot be written
    /// - [`Error::AddonNotFound`], [`Error::UnsupportedAddonFormat`] or
    ///   [`Error::InstallIo`] from addon installation
    pub fn create(&self, config: &ProfileConfig) -> Result<Profile> {
        let path = allocate_profile_dir(config.parent_dir.as_deref())?;
        tracing::debug!(path = %path.display(), browser = %config.browser_kind, "Allocated profile directory");

        let preferences = merge_preferences(
            defaults::common_defaults(),
            defaults::defaults_for(config.browser_kind),
            &config.override_preferences,
        );
        let prefs_path = path.join(USER_PREFS_FILE);
        write_preferences(&prefs_path, &preferences)?;
        tracing::debug!(
            count = preferences.len(),
            overrides = config.override_preferences.len(),
            "Wrote {}",
            USER_PREFS_FILE
        );

        let addon = match &config.addon_source {
            Some(source) => {
                let addon = Addon::from_source(source)?;
                self.installer
                    .install_addon(&addon, &path.join(EXTENSIONS_DIR))?;
                Some(addon)
            }
            None => None,
        };

        tracing::info!(path = %path.display(), addon = ?addon.as_ref().map(|a| &a.id), "Profile created");
        Ok(Profile {
            path,
            preferences,
            addon,
        })
    }
}

/// Build a profile with the default addon installer
///
/// # Example
///
/// ```rust,no_run
/// use ffprofile::{create_profile, ProfileConfig};
///
/// let profile = create_profile(&ProfileConfig::new().set_pref("browser.startup.page", 1_i64))?;
/// println!("Profile at {}", profile.path.display());
/// # Ok::<(), ffprofile::Error>(())
/// ```
pub fn create_profile(config: &ProfileConfig) -> Result<Profile> {
    ProfileBuilder::new().create(config)
}

/// Create a uniquely named, empty directory and detach it from cleanup
fn allocate_profile_dir(parent: Option<&Path>) -> Result<PathBuf> {
    let parent = parent
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);

    let dir = tempfile::Builder::new()
        .prefix(PROFILE_PREFIX)
        .tempdir_in(&parent)
        .map_err(|source| Error::ProfileAllocation {
            path: parent.clone(),
            source,
        })?;
    Ok(dir.keep())
}
