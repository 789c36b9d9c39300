//! Append-only per-user JSONL journals.
//!
//! Each user gets a `<user>.jsonl` file under the journal's directory;
//! every record is appended as a single JSON line. An in-memory
//! write-through cache keeps reads off disk after the first load, and
//! async wrappers route file I/O through `spawn_blocking` so the runtime
//! is never blocked.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use mitra_domain::error::{Error, Result};

/// Reduce an arbitrary user ID to a safe file stem.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, and a leading dot is
/// normalized away so IDs cannot traverse out of the journal directory
/// or produce hidden files.
pub(crate) fn file_stem_for(user_id: &str) -> String {
    let mut stem: String = user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.starts_with('.') {
        stem.insert(0, '_');
    }
    stem
}

/// Append-only JSONL journal for records of type `T`.
pub struct Journal<T> {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Vec<T>>>,
}

impl<T> Journal<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + 'static,
{
    /// Create the journal, ensuring its directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", file_stem_for(user_id)))
    }

    /// Append one record (sync). Disk first; the cache is only updated
    /// when the write succeeds.
    pub fn append(&self, user_id: &str, record: &T) -> Result<()> {
        // Warm the cache before appending so a later read does not load
        // the file and then double-count the cached record.
        self.load_cached(user_id)?;

        let line = serialize_line(record)?;
        write_line(&self.path_for(user_id), &line)?;

        let mut cache = self.cache.write();
        cache
            .entry(user_id.to_owned())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    /// Append one record (async) via `spawn_blocking`.
    pub async fn append_async(&self, user_id: &str, record: T) -> Result<()> {
        self.load_cached(user_id)?;

        let line = serialize_line(&record)?;
        let path = self.path_for(user_id);
        tokio::task::spawn_blocking(move || write_line(&path, &line))
            .await
            .map_err(|e| Error::Other(format!("spawn_blocking join: {e}")))??;

        let mut cache = self.cache.write();
        cache
            .entry(user_id.to_owned())
            .or_default()
            .push(record);
        Ok(())
    }

    /// All of a user's records, oldest first.
    pub fn all(&self, user_id: &str) -> Result<Vec<T>> {
        self.load_cached(user_id)
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, user_id: &str, n: usize) -> Result<Vec<T>> {
        let records = self.load_cached(user_id)?;
        let skip = records.len().saturating_sub(n);
        Ok(records[skip..].to_vec())
    }

    /// Return the user's records from cache, loading from disk on first
    /// access.
    fn load_cached(&self, user_id: &str) -> Result<Vec<T>> {
        {
            let cache = self.cache.read();
            if let Some(records) = cache.get(user_id) {
                return Ok(records.clone());
            }
        }

        let records = read_jsonl_file(&self.path_for(user_id))?;
        let mut cache = self.cache.write();
        cache.insert(user_id.to_owned(), records.clone());
        Ok(records)
    }
}

// ── Private helpers ───────────────────────────────────────────────

fn serialize_line<T: Serialize>(record: &T) -> Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}

fn write_line(path: &Path, line: &str) -> Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

fn read_jsonl_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping malformed journal line"
                );
            }
        }
    }
    Ok(records)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
