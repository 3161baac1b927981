//! Content hashes recorded by the previous run, keyed by canonical path.
use crate::persist::{load_json_or_default, write_json_atomic};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const HASH_STORE_FILE: &str = "hashes.json";

#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
    hashes: BTreeMap<String, String>,
}

impl VersionStore {
    /// Load `path`; a missing or corrupt store starts empty.
    pub fn load(path: &Path) -> Result<Self> {
        let hashes = load_json_or_default(path, "hash store")?;
        Ok(Self {
            path: path.to_path_buf(),
            hashes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.hashes.get(key).map(String::as_str)
    }

    pub fn put(&mut self, key: String, hash: String) {
        self.hashes.insert(key, hash);
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Overwrite the store file with the full in-memory map.
    pub fn save(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.hashes)
    }
}
