//! Append-only log of links that have already been posted.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::atomic::ensure_parent;
use crate::error::{PersistenceError, Result};

/// Newline-delimited record of delivered item links.
///
/// The log only grows. Each [`append`](PostedLinkLog::append) is synced to
/// disk before it returns.
#[derive(Debug, Clone)]
pub struct PostedLinkLog {
    path: PathBuf,
}

impl PostedLinkLog {
    /// Creates a log backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every recorded link. A missing file is an empty log.
    pub fn load_all(&self) -> Result<HashSet<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(source) => {
                return Err(PersistenceError::ReadError {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let links: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        trace!(count = links.len(), path = %self.path.display(), "loaded posted links");
        Ok(links)
    }

    /// Records one link.
    ///
    /// Links must be non-empty, single-line and free of surrounding
    /// whitespace, so that what [`load_all`](Self::load_all) returns matches
    /// what was appended.
    pub fn append(&self, link: &str) -> Result<()> {
        if link.is_empty() || link != link.trim() || link.contains(['\n', '\r']) {
            return Err(PersistenceError::InvalidLink(link.to_string()));
        }

        ensure_parent(&self.path)?;

        let write_err = |source| PersistenceError::WriteError {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(format!("{link}\n").as_bytes())
            .map_err(write_err)?;
        file.sync_data().map_err(write_err)?;

        debug!(link = %link, "recorded posted link");
        Ok(())
    }
}
