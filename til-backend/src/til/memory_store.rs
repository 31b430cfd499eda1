//! In-memory [`ContentStore`] for tests: relative path -> raw markdown.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use til_types::TilEntry;

use super::loader;
use super::store::ContentStore;
use crate::error::{TilError, TilResult};

#[derive(Default)]
pub struct MemoryContentStore {
    files: Mutex<BTreeMap<String, String>>,
    list_calls: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (path, raw) in files {
            store.insert(path, raw);
        }
        store
    }

    pub fn insert(&self, path: &str, raw: &str) {
        self.files.lock().insert(path.to_string(), raw.to_string());
    }

    pub fn remove(&self, path: &str) {
        self.files.lock().remove(path);
    }

    /// How many times `list_all` has run
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_all(&self) -> Vec<TilEntry> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock();

        // BTreeMap iteration is already path-sorted. Only `<dir>/<file>` keys
        // are listed, same as the disk scan.
        files
            .iter()
            .filter_map(|(path, raw)| match path.split('/').collect::<Vec<_>>().as_slice() {
                [dir, file] if loader::is_category_dir(dir) && loader::is_note_file(file) => {
                    Some(loader::entry_from_scan(dir, file, raw))
                }
                _ => None,
            })
            .collect()
    }

    async fn get_by_path(&self, relative_path: &str) -> TilResult<TilEntry> {
        let normalized = loader::normalize_lookup_path(relative_path)?;
        let files = self.files.lock();
        match files.get(&normalized) {
            Some(raw) => Ok(loader::entry_from_lookup(&normalized, raw)),
            None => Err(TilError::not_found()),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
