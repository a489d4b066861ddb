//! Batch file operations driven by path patterns
//!
//! `create` treats every argument as a literal target path and makes sure it
//! exists, creating parent directories as needed. `remove` expands every
//! argument as a glob pattern and deletes whatever matches. Both tolerate the
//! target already being in the requested state, so running either twice in a
//! row is harmless.

use glob::{MatchOptions, Pattern};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::FsOpsError;

const SEPARATORS: [char; 2] = ['/', std::path::MAIN_SEPARATOR];

/// Create files and directories relative to the current working directory
pub fn create_files<S: AsRef<str>>(paths: &[S]) -> Result<(), FsOpsError> {
    PathBatch::current().create(paths)
}

/// Remove files and directories matching the patterns, `**` acting as `*`
pub fn remove_files<S: AsRef<str>>(patterns: &[S]) -> Result<(), FsOpsError> {
    PathBatch::current().remove(patterns, false)
}

/// Remove files and directories matching the patterns, `**` crossing directories
pub fn remove_files_recursive<S: AsRef<str>>(patterns: &[S]) -> Result<(), FsOpsError> {
    PathBatch::current().remove(patterns, true)
}

/// Batch create/remove operations rooted at a directory
#[derive(Debug, Clone)]
pub struct PathBatch {
    root: PathBuf,
}

impl PathBatch {
    /// Resolve patterns against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve patterns against the working directory at call time
    pub fn current() -> Self {
        Self::new(".")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure every path exists.
    ///
    /// A path ending in a separator only creates the directory chain. Anything
    /// else also gets an empty regular file at the leaf, unless something
    /// already exists there, in which case it is left untouched. Wildcards are
    /// not expanded: `*.txt` creates a file literally named `*.txt`.
    pub fn create<S: AsRef<str>>(&self, paths: &[S]) -> Result<(), FsOpsError> {
        let mut created = 0usize;
        for raw in paths.iter().map(AsRef::as_ref) {
            if self.create_one(raw)? {
                created += 1;
            }
        }
        info!(
            "Created {} new file(s) for {} path(s) under {}",
            created,
            paths.len(),
            self.root.display()
        );
        Ok(())
    }

    /// Returns `true` if a new file was created
    fn create_one(&self, raw: &str) -> Result<bool, FsOpsError> {
        if raw.is_empty() {
            debug!("create: skipping empty path");
            return Ok(false);
        }

        let relative = Path::new(raw);
        if raw.ends_with(SEPARATORS) {
            create_dir_chain(&self.root.join(relative))?;
            return Ok(false);
        }

        if let Some(dir) = relative.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_chain(&self.root.join(dir))?;
        }

        let target = self.root.join(relative);
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(_) => {
                debug!("create: created {}", target.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("create: {} already present", target.display());
                Ok(false)
            }
            Err(source) => Err(FsOpsError::CreateFile { path: target, source }),
        }
    }

    /// Delete everything the patterns match.
    ///
    /// Directories are deleted with their contents; files and symlinks are
    /// unlinked. A pattern matching nothing is skipped, as is a match that
    /// vanishes before it can be deleted. With `recursive == false`, `**`
    /// matches a single path component like `*`. A `**` that is not a whole
    /// component (`build**`) always acts like `*`.
    ///
    /// Any other filesystem error aborts the call. Patterns handled before the
    /// failing one stay applied.
    pub fn remove<S: AsRef<str>>(&self, patterns: &[S], recursive: bool) -> Result<(), FsOpsError> {
        let mut removed = 0usize;
        for raw in patterns.iter().map(AsRef::as_ref) {
            removed += self.remove_one(raw, recursive)?;
        }
        info!(
            "Removed {} path(s) matching {} pattern(s) under {}",
            removed,
            patterns.len(),
            self.root.display()
        );
        Ok(())
    }

    fn remove_one(&self, raw: &str, recursive: bool) -> Result<usize, FsOpsError> {
        let Some(pattern) = self.expand_pattern(raw, recursive) else {
            debug!("remove: skipping empty pattern {:?}", raw);
            return Ok(0);
        };

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        let entries = glob::glob_with(&pattern, options).map_err(|source| FsOpsError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matches.push(path),
                Err(e) if e.error().kind() == ErrorKind::NotFound => {
                    debug!("remove: {} vanished during expansion", e.path().display());
                }
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(FsOpsError::Expand {
                        pattern: raw.to_string(),
                        path,
                        source: e.into_error(),
                    });
                }
            }
        }

        if matches.is_empty() {
            debug!("remove: no matches for {:?}", raw);
            return Ok(0);
        }

        let mut removed = 0;
        for path in matches {
            if remove_path(&path)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Build the full glob pattern for `raw`, or `None` if nothing is left
    /// once trailing separators are stripped.
    fn expand_pattern(&self, raw: &str, recursive: bool) -> Option<String> {
        let trimmed = raw.trim_end_matches(SEPARATORS);
        if trimmed.is_empty() {
            return None;
        }
        let pattern = trimmed
            .split('/')
            .map(|component| {
                if recursive && component == "**" {
                    component.to_string()
                } else {
                    collapse_double_star(component)
                }
            })
            .collect::<Vec<_>>()
            .join("/");
        if Path::new(&pattern).is_absolute() {
            return Some(pattern);
        }
        let root = Pattern::escape(&self.root.to_string_lossy());
        Some(format!("{}/{}", root.trim_end_matches(SEPARATORS), pattern))
    }
}

fn collapse_double_star(component: &str) -> String {
    let mut collapsed = component.to_string();
    while collapsed.contains("**") {
        collapsed = collapsed.replace("**", "*");
    }
    collapsed
}

fn create_dir_chain(dir: &Path) -> Result<(), FsOpsError> {
    fs::create_dir_all(dir).map_err(|source| FsOpsError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Delete one match. Returns `false` if it was already gone.
fn remove_path(path: &Path) -> Result<bool, FsOpsError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("remove: {} already absent", path.display());
            return Ok(false);
        }
        Err(source) => {
            return Err(FsOpsError::Remove {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            debug!("remove: deleted {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("remove: {} already absent", path.display());
            Ok(false)
        }
        Err(source) => Err(FsOpsError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
