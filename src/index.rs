//! Index accumulator and its persistence boundary.
//!
//! An [`Index`] maps entity slug to normalized record. It only grows during
//! a run: [`Index::merge`] inserts or overwrites, never removes. Writing is
//! decoupled from merging; the pipeline asks a [`PersistSchedule`] when a
//! snapshot is due and hands the whole index to an [`IndexSink`].
//!
//! Every snapshot is the complete mapping, replacing the previous one.
//! [`JsonFileSink`] writes to a sibling temporary file and renames it over
//! the destination, so the destination never holds a half-written document.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index<R> {
    entries: BTreeMap<String, R>,
}

impl<R> Default for Index<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R> Index<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry at `name`. Returns `true` when the key
    /// was not present before.
    pub fn merge(&mut self, name: impl Into<String>, record: R) -> bool {
        self.entries.insert(name.into(), record).is_none()
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<R: Serialize> Index<R> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Write the full mapping through `sink`.
    pub fn persist(&self, sink: &dyn IndexSink) -> Result<()> {
        sink.write(&self.to_json()?)
    }
}

impl<R: DeserializeOwned> Index<R> {
    /// Read a snapshot written by [`JsonFileSink`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse index: {}", path.display()))?;
        Ok(Self { entries })
    }
}

/// Destination for complete index snapshots.
pub trait IndexSink {
    /// Human-readable destination, for logs and the run summary.
    fn describe(&self) -> String;

    /// Replace the destination's content with `document` in full.
    fn write(&self, document: &str) -> Result<()>;
}

/// Writes snapshots to a JSON file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl IndexSink for JsonFileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, document)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "Failed to move {} into place at {}",
                tmp.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

/// Keeps every snapshot in memory.
#[derive(Default)]
pub struct MemorySink {
    snapshots: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<String> {
        self.snapshots.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.snapshots.borrow().last().cloned()
    }
}

impl IndexSink for MemorySink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn write(&self, document: &str) -> Result<()> {
        self.snapshots.borrow_mut().push(document.to_string());
        Ok(())
    }
}

/// Decides when a snapshot is due: after every `every` merges, plus once
/// more at the end of a run if merges are still unpersisted.
#[derive(Debug, Clone)]
pub struct PersistSchedule {
    every: usize,
    pending: usize,
}

impl PersistSchedule {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            pending: 0,
        }
    }

    /// Count one merge; returns `true` when a snapshot is due now.
    pub fn record_merge(&mut self) -> bool {
        self.pending += 1;
        self.pending >= self.every
    }

    pub fn mark_persisted(&mut self) {
        self.pending = 0;
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }
}
