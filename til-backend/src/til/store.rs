//! Content stores, the places TIL notes are read from
//!
//! [`FsContentStore`] reads the `<category>/<slug>.md` tree from disk. Tests
//! swap in an in-memory store behind the same trait.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use til_types::TilEntry;
use tokio::fs;

use super::loader;
use crate::error::{TilError, TilResult};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every note in the store, sorted by path.
    ///
    /// Never fails: an unreadable root yields an empty list and a warning.
    async fn list_all(&self) -> Vec<TilEntry>;

    /// Read one note directly, bypassing any cache
    async fn get_by_path(&self, relative_path: &str) -> TilResult<TilEntry>;

    /// Human-readable location, for logs and the info endpoint
    fn describe(&self) -> String;
}

/// Notes stored as markdown files under a root directory
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn scan(&self) -> io::Result<Vec<TilEntry>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&self.root).await?;

        while let Some(item) = read_dir.next_entry().await? {
            let name = match item.file_name().to_str() {
                Some(n) => n.to_string(),
                None => continue,
            };
            let path = item.path();

            // Follows symlinks, so linked category dirs are scanned too
            let metadata = match fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("[TIL] Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            // Files directly in the root are not notes
            if metadata.is_dir() && loader::is_category_dir(&name) {
                self.scan_category(&name, &path, &mut entries).await;
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Load the notes directly inside one category directory (no recursion)
    async fn scan_category(&self, dir_name: &str, dir_path: &Path, entries: &mut Vec<TilEntry>) {
        let mut read_dir = match fs::read_dir(dir_path).await {
            Ok(rd) => rd,
            Err(e) => {
                log::warn!("[TIL] Skipping category {}: {}", dir_name, e);
                return;
            }
        };

        loop {
            let item = match read_dir.next_entry().await {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("[TIL] Stopped listing category {} early: {}", dir_name, e);
                    break;
                }
            };

            let name = match item.file_name().to_str() {
                Some(n) => n.to_string(),
                None => continue,
            };
            if !loader::is_note_file(&name) {
                continue;
            }

            let path = item.path();
            match fs::metadata(&path).await {
                Ok(m) if m.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("[TIL] Skipping {}: {}", path.display(), e);
                    continue;
                }
            }

            if let Some(entry) = read_entry(dir_name, &name, &path).await {
                entries.push(entry);
            }
        }
    }
}

/// Read one file into an entry. Unreadable files are logged and skipped.
async fn read_entry(dir: &str, file_name: &str, path: &Path) -> Option<TilEntry> {
    match fs::read(path).await {
        Ok(raw) => Some(loader::entry_from_scan(
            dir,
            file_name,
            &String::from_utf8_lossy(&raw),
        )),
        Err(e) => {
            log::warn!("[TIL] Skipping unreadable note {}: {}", path.display(), e);
            None
        }
    }
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn list_all(&self) -> Vec<TilEntry> {
        match self.scan().await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "[TIL] Cannot read content directory {}: {}",
                    self.root.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn get_by_path(&self, relative_path: &str) -> TilResult<TilEntry> {
        let normalized = loader::normalize_lookup_path(relative_path)?;
        let full_path = self.root.join(&normalized);

        match fs::metadata(&full_path).await {
            Ok(m) if m.is_file() => {}
            Ok(_) => return Err(TilError::not_found()),
            Err(e) if is_missing(&e) => return Err(TilError::not_found()),
            Err(e) => return Err(e.into()),
        }

        // Security: a symlink inside the tree must not lead outside it
        let canonical_root = fs::canonicalize(&self.root).await?;
        let canonical_path = fs::canonicalize(&full_path).await?;
        if !canonical_path.starts_with(&canonical_root) {
            return Err(TilError::InvalidPath(relative_path.to_string()));
        }

        let raw = match fs::read(&canonical_path).await {
            Ok(raw) => raw,
            Err(e) if is_missing(&e) => return Err(TilError::not_found()),
            Err(e) => return Err(e.into()),
        };

        Ok(loader::entry_from_lookup(
            &normalized,
            &String::from_utf8_lossy(&raw),
        ))
    }

    fn describe(&self) -> String {
        format!("filesystem:{}", self.root().display())
    }
}
