use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::{BACKUP_SUFFIX, WORKING_SUFFIX};
use crate::error::{Error, Result};
use crate::ext::string::{ensure_filename, StrExt};

/// Extension trait for Path: file metadata, safe renames and copies, and
/// directory searches.
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use valuekit::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Converts a path to a String using display(), which always succeeds
    /// but may use replacement characters for invalid Unicode.
    fn to_string_lossy(&self) -> String;

    /// Size in bytes, or `None` when the path cannot be read.
    fn file_size(&self) -> Option<u64>;
    fn creation_date(&self) -> Option<DateTime<Local>>;
    fn modification_date(&self) -> Option<DateTime<Local>>;
    fn is_directory(&self) -> bool;

    /// Renames the item in place to `filename`, keeping its directory.
    ///
    /// # Errors
    /// * `InvalidFilename` - `filename` is empty or contains a separator
    /// * `DestinationExists` - the target exists and `delete_existing` is false
    /// * `SourceMissing` - nothing exists at `self`; the target is left alone
    fn rename_to_filename(&self, filename: &str, delete_existing: bool) -> Result<PathBuf>;

    /// The in-progress path written before renaming onto `self`.
    fn working_path(&self) -> PathBuf;

    /// Finishes a write through a working path: on success the working file
    /// replaces its final path, otherwise it is deleted. Returns the final path.
    /// A missing working file fails with `SourceMissing` and leaves the final
    /// path untouched.
    fn rename_working_file(&self, success: bool) -> Result<PathBuf>;

    /// Deletes the file or directory. True when nothing is left at the path.
    fn remove_if_exists(&self) -> bool;

    /// `dir/name backup.ext` next to the file.
    fn backup_file_path(&self) -> PathBuf;
    /// Copies the file to its backup path, replacing an older backup.
    fn backup(&self) -> bool;
    /// Copies the file to `name<suffix>.ext` in the same directory.
    fn copy_with_suffix(&self, suffix: &str, replace: bool) -> Result<PathBuf>;

    fn paths_with_fragments(&self, fragments: &[&str], is_extension: bool, deep: bool) -> Vec<PathBuf>;
    fn paths(&self, deep: bool) -> Vec<PathBuf>;
    fn paths_with_extensions(&self, extensions: &[&str], deep: bool) -> Vec<PathBuf>;
    fn paths_with_extension(&self, extension: &str, deep: bool) -> Vec<PathBuf>;
    fn paths_with_filenames(&self, fragments: &[&str], deep: bool) -> Vec<PathBuf>;
    fn paths_with_filename(&self, fragment: &str, deep: bool) -> Vec<PathBuf>;

    /// File name without its extension, or an empty string.
    fn file_stem_string(&self) -> String;
    /// The path itself if free, else the first free `name N.ext` (N from 2).
    fn unique_path(&self) -> PathBuf;
    /// A free path inside this directory based on `prefix`.
    fn unique_path_with_prefix(&self, prefix: &str) -> PathBuf;
    /// Creates the directory (and its parents) when missing.
    fn validated_directory_path(&self) -> Result<PathBuf>;
    /// Creates the parent directory of the file when missing.
    fn validated_file_path(&self) -> Result<PathBuf>;
    /// Replaces a leading `~` with the home directory.
    fn expanded(&self) -> PathBuf;
    /// Replaces the home directory prefix with `~`.
    fn abbreviated(&self) -> PathBuf;
    /// Joins `dirty_name` after making it a safe file name.
    fn join_cleaned(&self, dirty_name: &str, default: &str) -> PathBuf;
}

fn sibling_with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_stem_string();
    name.push_str(suffix);
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    path.with_file_name(name)
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_string_lossy(&self) -> String {
        self.display().to_string()
    }

    fn file_size(&self) -> Option<u64> {
        fs::metadata(self).ok().map(|metadata| metadata.len())
    }

    fn creation_date(&self) -> Option<DateTime<Local>> {
        fs::metadata(self).and_then(|metadata| metadata.created()).ok().map(DateTime::<Local>::from)
    }

    fn modification_date(&self) -> Option<DateTime<Local>> {
        fs::metadata(self).and_then(|metadata| metadata.modified()).ok().map(DateTime::<Local>::from)
    }

    fn is_directory(&self) -> bool {
        self.is_dir()
    }

    fn rename_to_filename(&self, filename: &str, delete_existing: bool) -> Result<PathBuf> {
        let filename = ensure_filename(filename)?;
        let parent = self.parent().ok_or_else(|| Error::NoParentDirectory {
            path: self.display().to_string(),
        })?;
        let destination = parent.join(filename);
        if destination == self {
            return Ok(destination);
        }
        if !self.exists() {
            return Err(Error::SourceMissing {
                path: self.display().to_string(),
            });
        }
        if destination.exists() {
            if !delete_existing {
                return Err(Error::DestinationExists {
                    path: destination.display().to_string(),
                });
            }
            debug!("Removing '{}' before rename", destination.display());
            remove_path(&destination)?;
        }
        fs::rename(self, &destination)?;
        info!("Renamed '{}' to '{}'", self.display(), destination.display());
        Ok(destination)
    }

    fn working_path(&self) -> PathBuf {
        let mut name = self.file_name().unwrap_or_default().to_os_string();
        name.push(WORKING_SUFFIX);
        self.with_file_name(name)
    }

    fn rename_working_file(&self, success: bool) -> Result<PathBuf> {
        let name = self.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        let final_name = name
            .strip_suffix(WORKING_SUFFIX)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| Error::InvalidFilename { filename: name.to_string() })?;
        let final_path = self.with_file_name(final_name);
        if success {
            if !self.exists() {
                return Err(Error::SourceMissing {
                    path: self.display().to_string(),
                });
            }
            // rename replaces a file in place but cannot replace a directory
            if final_path.is_dir() {
                fs::remove_dir_all(&final_path)?;
            }
            fs::rename(self, &final_path)?;
            debug!("Committed working file '{}'", final_path.display());
        } else if self.exists() {
            remove_path(self)?;
            debug!("Discarded working file '{}'", self.display());
        }
        Ok(final_path)
    }

    fn remove_if_exists(&self) -> bool {
        if !self.exists() {
            return true;
        }
        match remove_path(self) {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to remove '{}': {}", self.display(), err);
                false
            }
        }
    }

    fn backup_file_path(&self) -> PathBuf {
        sibling_with_stem_suffix(self, BACKUP_SUFFIX)
    }

    fn backup(&self) -> bool {
        if !self.is_file() {
            debug!("Nothing to back up at '{}'", self.display());
            return false;
        }
        let destination = self.backup_file_path();
        match fs::copy(self, &destination) {
            Ok(_) => true,
            Err(err) => {
                warn!("Failed to back up '{}': {}", self.display(), err);
                false
            }
        }
    }

    fn copy_with_suffix(&self, suffix: &str, replace: bool) -> Result<PathBuf> {
        let destination = sibling_with_stem_suffix(self, suffix);
        if destination.exists() && !replace {
            return Err(Error::DestinationExists {
                path: destination.display().to_string(),
            });
        }
        fs::copy(self, &destination)?;
        Ok(destination)
    }

    fn paths_with_fragments(&self, fragments: &[&str], is_extension: bool, deep: bool) -> Vec<PathBuf> {
        let search = PathSearch::new(self).deep(deep);
        if is_extension {
            search.extensions(fragments).run()
        } else {
            search.filenames(fragments).run()
        }
    }

    fn paths(&self, deep: bool) -> Vec<PathBuf> {
        PathSearch::new(self).deep(deep).run()
    }

    fn paths_with_extensions(&self, extensions: &[&str], deep: bool) -> Vec<PathBuf> {
        self.paths_with_fragments(extensions, true, deep)
    }

    fn paths_with_extension(&self, extension: &str, deep: bool) -> Vec<PathBuf> {
        self.paths_with_fragments(&[extension], true, deep)
    }

    fn paths_with_filenames(&self, fragments: &[&str], deep: bool) -> Vec<PathBuf> {
        self.paths_with_fragments(fragments, false, deep)
    }

    fn paths_with_filename(&self, fragment: &str, deep: bool) -> Vec<PathBuf> {
        self.paths_with_fragments(&[fragment], false, deep)
    }

    fn file_stem_string(&self) -> String {
        self.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
    }

    fn unique_path(&self) -> PathBuf {
        if !self.exists() {
            return self.to_path_buf();
        }
        (2u64..)
            .map(|n| sibling_with_stem_suffix(self, &format!(" {n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| self.to_path_buf())
    }

    fn unique_path_with_prefix(&self, prefix: &str) -> PathBuf {
        self.join(prefix).unique_path()
    }

    fn validated_directory_path(&self) -> Result<PathBuf> {
        if !self.is_dir() {
            fs::create_dir_all(self)?;
            debug!("Created directory '{}'", self.display());
        }
        Ok(self.to_path_buf())
    }

    fn validated_file_path(&self) -> Result<PathBuf> {
        match self.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            Some(parent) => {
                parent.validated_directory_path()?;
            }
            None if self.is_relative() => {}
            None => {
                return Err(Error::NoParentDirectory {
                    path: self.display().to_string(),
                })
            }
        }
        Ok(self.to_path_buf())
    }

    fn expanded(&self) -> PathBuf {
        let Ok(rest) = self.strip_prefix("~") else {
            return self.to_path_buf();
        };
        match dirs::home_dir() {
            Some(home) if rest.as_os_str().is_empty() => home,
            Some(home) => home.join(rest),
            None => self.to_path_buf(),
        }
    }

    fn abbreviated(&self) -> PathBuf {
        let Some(home) = dirs::home_dir() else {
            return self.to_path_buf();
        };
        match self.strip_prefix(&home) {
            Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from("~"),
            Ok(rest) => Path::new("~").join(rest),
            Err(_) => self.to_path_buf(),
        }
    }

    fn join_cleaned(&self, dirty_name: &str, default: &str) -> PathBuf {
        self.join(dirty_name.cleaning_filename(default))
    }
}

/// A directory search by file name or extension fragments.
///
/// An empty fragment list matches every entry below the base directory.
#[derive(Debug, Clone)]
pub struct PathSearch<'a> {
    base: &'a Path,
    fragments: Vec<String>,
    match_extension: bool,
    deep: bool,
    first_only: bool,
}

impl<'a> PathSearch<'a> {
    pub fn new(base: &'a Path) -> Self {
        Self {
            base,
            fragments: Vec::new(),
            match_extension: false,
            deep: false,
            first_only: false,
        }
    }

    /// Matches extensions exactly, ignoring case and a leading dot.
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.fragments = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self.match_extension = true;
        self
    }

    /// Matches file names containing any fragment, ignoring case.
    pub fn filenames(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|fragment| fragment.to_lowercase()).collect();
        self.match_extension = false;
        self
    }

    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn first_only(mut self, first_only: bool) -> Self {
        self.first_only = first_only;
        self
    }

    fn matches(&self, path: &Path) -> bool {
        if self.fragments.is_empty() {
            return true;
        }
        if self.match_extension {
            let Some(extension) = path.extension() else {
                return false;
            };
            let extension = extension.to_string_lossy().to_lowercase();
            self.fragments.iter().any(|fragment| *fragment == extension)
        } else {
            let Some(name) = path.file_name() else {
                return false;
            };
            let name = name.to_string_lossy().to_lowercase();
            self.fragments.iter().any(|fragment| name.contains(fragment.as_str()))
        }
    }

    /// Sorted matching paths. A missing base directory yields no paths.
    pub fn run(&self) -> Vec<PathBuf> {
        if !self.base.is_dir() {
            debug!("Search base '{}' is not a directory", self.base.display());
            return Vec::new();
        }
        let mut walker = WalkDir::new(self.base).min_depth(1).sort_by_file_name();
        if !self.deep {
            walker = walker.max_depth(1);
        }

        let mut found = Vec::new();
        for dir_entry in walker {
            let entry = match dir_entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if self.matches(entry.path()) {
                found.push(entry.into_path());
                if self.first_only {
                    break;
                }
            }
        }
        found.sort();
        found
    }
}
