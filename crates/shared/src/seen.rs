use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Flat-file record of article URLs that were already sent.
///
/// One URL per line, sorted on write. The file is rewritten in full on every
/// save and is not locked, so two concurrent runs race and the last writer wins.
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the seen-set, or an empty set if the file does not exist yet
    pub fn load(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            PipelineError::Storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Overwrite the file with the sorted contents of `seen`
    pub fn save(&self, seen: &HashSet<String>) -> Result<()> {
        let mut urls: Vec<&str> = seen.iter().map(String::as_str).collect();
        urls.sort_unstable();

        fs::write(&self.path, urls.join("\n")).map_err(|e| {
            PipelineError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}
