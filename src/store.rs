// src/store.rs
//! In-memory records for one entity type and their persisted document.
//!
//! Keys keep first-seen order. The document is written whole: to a sibling
//! temp file first, then renamed over the target, so a reader never sees a
//! half-written file. Nothing is read back; every run starts empty.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::ScrapeError;

/// Title → outcome options for one character or support card.
pub type TrainingEvents = IndexMap<String, Vec<String>>;

const INDENT: &[u8] = b"    ";

#[derive(Clone, Debug)]
pub struct DataStore<V> {
    records: IndexMap<String, V>,
    checkpoint_path: Option<PathBuf>,
}

impl<V> Default for DataStore<V> {
    fn default() -> Self {
        Self { records: IndexMap::new(), checkpoint_path: None }
    }
}

impl<V> DataStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also rewrite the document at `path` on every [`checkpoint`](Self::checkpoint).
    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    /// Insert unless `key` is empty or already present. First write wins.
    pub fn put(&mut self, key: &str, value: V) -> bool {
        if key.is_empty() {
            return false;
        }
        match self.records.entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> &IndexMap<String, V> {
        &self.records
    }
}

impl<V: Default> DataStore<V> {
    /// The record for `key`, created empty if absent.
    pub fn entry(&mut self, key: &str) -> &mut V {
        self.records.entry(key.to_string()).or_default()
    }
}

impl<T> DataStore<IndexMap<String, T>> {
    /// Create `key` if absent, then add the sub-keys it does not have yet.
    /// Existing sub-keys are kept. Returns how many were added.
    pub fn merge(&mut self, key: &str, sub: IndexMap<String, T>) -> usize {
        let target = self.records.entry(key.to_string()).or_default();
        let mut added = 0;
        for (k, v) in sub {
            if let Entry::Vacant(slot) = target.entry(k) {
                slot.insert(v);
                added += 1;
            }
        }
        added
    }
}

impl<V: Serialize> DataStore<V> {
    pub fn to_json(&self) -> Result<Vec<u8>, ScrapeError> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        self.records.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Write the whole mapping to `path`, replacing whatever was there.
    pub fn save(&self, path: &Path) -> Result<(), ScrapeError> {
        let bytes = self.to_json()?;
        write_replace(path, &bytes).map_err(|source| ScrapeError::Persist { path: path.to_path_buf(), source })?;
        logf!("Saved {} items to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Save to the checkpoint path, if one was configured.
    pub fn checkpoint(&self) -> Result<(), ScrapeError> {
        match &self.checkpoint_path {
            Some(path) => {
                let bytes = self.to_json()?;
                write_replace(path, &bytes).map_err(|source| ScrapeError::Persist { path: path.clone(), source })?;
                logd!("Checkpointed {} items to {}", self.records.len(), path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

fn write_replace(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}
