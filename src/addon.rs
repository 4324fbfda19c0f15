//! Addon installation
//!
//! An addon source is either a packed archive (`.xpi`/`.zip`), which is
//! copied into the extensions directory as-is, or an unpacked directory,
//! which is copied recursively under the addon's id:
//!
//! ```text
//! extensions/
//!   @simple-addon.xpi        packed: the archive itself
//!   @unpacked-addon/         unpacked: the full source tree
//! ```
//!
//! Classification ([`classify`]) is a pure function of the source's kind and
//! name. Writes go through the [`AddonFs`] trait so installs can be observed
//! without touching the disk.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as packed addon archives (compared case-insensitively)
pub const ARCHIVE_EXTENSIONS: &[&str] = &["xpi", "zip"];

/// How an addon is laid out in the extensions directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// Single archive file, installed without extraction
    Packed,
    /// Directory tree, installed by copying
    Unpacked,
}

/// What an addon source path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Missing,
    File,
    Directory,
    /// Exists but is neither a regular file nor a directory
    Other,
}

impl SourceKind {
    /// Inspect `path` on disk, following symlinks
    pub fn probe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => SourceKind::Directory,
            Ok(meta) if meta.is_file() => SourceKind::File,
            Ok(_) => SourceKind::Other,
            Err(_) => SourceKind::Missing,
        }
    }
}

/// Decide how a source of the given kind installs
///
/// ```rust
/// use ffprofile::{classify, InstallType, SourceKind};
/// use std::path::Path;
///
/// let packed = classify(Path::new("@simple-addon.xpi"), SourceKind::File)?;
/// assert_eq!(packed, InstallType::Packed);
///
/// let unpacked = classify(Path::new("@unpacked-addon"), SourceKind::Directory)?;
/// assert_eq!(unpacked, InstallType::Unpacked);
///
/// assert!(classify(Path::new("notes.txt"), SourceKind::File).is_err());
/// # Ok::<(), ffprofile::Error>(())
/// ```
pub fn classify(path: &Path, kind: SourceKind) -> Result<InstallType> {
    match kind {
        SourceKind::Missing => Err(Error::AddonNotFound(path.to_path_buf())),
        SourceKind::Directory => Ok(InstallType::Unpacked),
        SourceKind::File if has_archive_extension(path) => Ok(InstallType::Packed),
        SourceKind::File | SourceKind::Other => {
            Err(Error::UnsupportedAddonFormat(path.to_path_buf()))
        }
    }
}

fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// An addon about to be installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addon {
    /// Identifier taken from the source name, without any archive extension
    pub id: String,
    pub source_path: PathBuf,
    pub install_type: InstallType,
}

impl Addon {
    /// Classify `path` on disk and derive the addon id from its name
    pub fn from_source(path: &Path) -> Result<Self> {
        // "." or "dir/.." have no leaf name of their own
        let resolved;
        let path = if path.file_name().is_none() {
            resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            resolved.as_path()
        } else {
            path
        };
        Self::from_kind(path, SourceKind::probe(path))
    }

    /// Build an addon for a source whose kind is already known
    pub fn from_kind(path: &Path, kind: SourceKind) -> Result<Self> {
        let install_type = classify(path, kind)?;
        let leaf = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::UnsupportedAddonFormat(path.to_path_buf()))?;

        let id = if has_archive_extension(path) {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| leaf.clone())
        } else {
            leaf
        };

        Ok(Addon {
            id,
            source_path: path.to_path_buf(),
            install_type,
        })
    }

    /// Name of the entry created in the extensions directory
    ///
    /// Packed addons keep the archive's file name; unpacked addons use the id.
    pub fn install_name(&self) -> String {
        match self.install_type {
            InstallType::Packed => self
                .source_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.id.clone()),
            InstallType::Unpacked => self.id.clone(),
        }
    }
}

/// Filesystem writes performed during installation
pub trait AddonFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    /// Copy a single file's bytes from `from` to `to`, replacing `to`
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`AddonFs`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl AddonFs for StdFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

/// Installs a single addon into an extensions directory
///
/// # Example
///
/// ```rust,no_run
/// use ffprofile::AddonInstaller;
/// use std::path::Path;
///
/// let installer = AddonInstaller::new();
/// let installed = installer.install(
///     Path::new("addons/@simple-addon.xpi"),
///     Path::new("/tmp/profile/extensions"),
/// )?;
/// assert!(installed.ends_with("@simple-addon.xpi"));
/// # Ok::<(), ffprofile::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AddonInstaller<F: AddonFs = StdFs> {
    fs: F,
}

impl AddonInstaller<StdFs> {
    pub fn new() -> Self {
        Self::with_fs(StdFs)
    }
}

impl<F: AddonFs> AddonInstaller<F> {
    /// Create an installer that writes through `fs`
    pub fn with_fs(fs: F) -> Self {
        AddonInstaller { fs }
    }

    /// Classify `source` and install it into `dest_dir`
    ///
    /// Returns the installed path: `dest_dir/<archive file name>` for packed
    /// addons, `dest_dir/<id>` for unpacked ones. `dest_dir` is created if
    /// absent; `source` is never modified.
    pub fn install(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf> {
        let addon = Addon::from_source(source)?;
        self.install_addon(&addon, dest_dir)
    }

    /// Install an already classified addon into `dest_dir`
    pub fn install_addon(&self, addon: &Addon, dest_dir: &Path) -> Result<PathBuf> {
        tracing::debug!(
            addon = %addon.id,
            install_type = ?addon.install_type,
            source = %addon.source_path.display(),
            "Installing addon"
        );

        if addon.install_type == InstallType::Unpacked {
            ensure_outside_source(&addon.source_path, dest_dir)?;
        }

        self.create_dir(dest_dir)?;
        let target = dest_dir.join(addon.install_name());

        match addon.install_type {
            InstallType::Packed => self.copy_file(&addon.source_path, &target)?,
            InstallType::Unpacked => self.copy_tree(&addon.source_path, &target)?,
        }

        tracing::debug!(addon = %addon.id, target = %target.display(), "Addon installed");
        Ok(target)
    }

    /// Recursively copy the contents of `source` into `target`
    fn copy_tree(&self, source: &Path, target: &Path) -> Result<()> {
        self.create_dir(target)?;

        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::InstallIo {
                operation: "read",
                path: e.path().unwrap_or(source).to_path_buf(),
                source: e.into(),
            })?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| Error::InstallIo {
                    operation: "resolve",
                    path: entry.path().to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, e),
                })?;
            let dest = target.join(relative);

            let file_type = entry.file_type();
            if file_type.is_dir() {
                self.create_dir(&dest)?;
            } else if file_type.is_file() || entry.path().is_file() {
                // Symlinks to regular files are copied as their contents
                self.copy_file(entry.path(), &dest)?;
            } else {
                tracing::warn!(
                    path = %entry.path().display(),
                    "Skipping addon entry that is neither a file nor a directory"
                );
            }
        }

        Ok(())
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.fs
            .create_dir_all(path)
            .map_err(|source| Error::InstallIo {
                operation: "create directory",
                path: path.to_path_buf(),
                source,
            })
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        tracing::trace!(from = %from.display(), to = %to.display(), "Copying addon file");
        self.fs.copy_file(from, to).map_err(|source| Error::InstallIo {
            operation: "copy",
            path: to.to_path_buf(),
            source,
        })
    }
}

/// Refuse an unpacked install whose destination lies inside its own source
///
/// The walk would otherwise descend into the copies it creates.
fn ensure_outside_source(source: &Path, dest_dir: &Path) -> Result<()> {
    let source_real = resolve(source);
    let dest_real = resolve(dest_dir);
    if dest_real.starts_with(&source_real) {
        return Err(Error::InstallIo {
            operation: "copy into",
            path: dest_dir.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination is inside addon source {}", source_real.display()),
            ),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest
fn resolve(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(real) = fs::canonicalize(current) {
            return missing.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            _ => return path.to_path_buf(),
        }
    }
}
