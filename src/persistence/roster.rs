//! Static roster of known student identifiers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Line-oriented roster file, one identifier per line.
///
/// Read fresh on every call; edits to the file show up immediately.
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    /// Creates a handle for the roster at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the roster file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the roster in file order. A missing file is an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_roster(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Trims lines and drops blanks and `#` comments.
#[must_use]
pub fn parse_roster(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
