//! Caller-owned collect session state.
//!
//! Every raw page received during a run is appended to one timestamped
//! backup file so a crashed or interrupted run loses nothing. The session
//! is an explicit value owned by the caller; two concurrent sessions write
//! to two distinct files and never interfere.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;

/// Accumulates raw pages and mirrors them to a JSON backup file.
#[derive(Debug)]
pub struct CollectSession {
    backup_dir: PathBuf,
    backup_file: Option<PathBuf>,
    pages: Vec<Value>,
}

impl CollectSession {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            backup_file: None,
            pages: Vec::new(),
        }
    }

    /// The backup file path, once the first page has been recorded.
    pub fn backup_file(&self) -> Option<&Path> {
        self.backup_file.as_deref()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Records one raw page and rewrites the backup file.
    ///
    /// The backup file is created lazily on the first page so empty runs
    /// leave no artifact. A page that cannot be serialized is dropped with
    /// a warning; the collection loop continues.
    pub fn record_page(&mut self, page: Value) -> Result<()> {
        self.pages.push(page);
        let path = match &self.backup_file {
            Some(path) => path.clone(),
            None => {
                std::fs::create_dir_all(&self.backup_dir)?;
                let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                let path = self.backup_dir.join(format!("backup_{timestamp}.json"));
                info!(path = %path.display(), "session backup file created");
                self.backup_file = Some(path.clone());
                path
            }
        };
        match serde_json::to_string_pretty(&self.pages) {
            Ok(contents) => {
                std::fs::write(&path, contents)?;
                Ok(())
            }
            Err(error) => {
                warn!(%error, "could not serialize backup page, dropping it");
                self.pages.pop();
                Ok(())
            }
        }
    }
}
