use async_trait::async_trait;
use burrow_core::error::{Result, StorageError};
use burrow_core::repository::{ReadRepository, Repository};
use burrow_core::shortcode::ShortCode;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const INDENT: &[u8] = b"    ";

/// Mapping store mirrored to a single JSON file.
///
/// The file holds one object mapping each short code to its long URL,
/// pretty-printed with four-space indentation. Every write goes to a
/// temporary file in the same directory which is then renamed over the
/// canonical path, so a crash mid-write leaves the previous copy intact.
///
/// Inserts and persists are serialized by `writer`. An insert is staged
/// on a copy of the table and only published once the file has been
/// replaced, so readers never see a mapping that is not on disk. The
/// table lock is never held across the disk write.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    table: RwLock<BTreeMap<ShortCode, String>>,
    writer: Mutex<()>,
}

impl JsonFileRepository {
    /// Loads the store from `path`.
    ///
    /// A missing file yields an empty store. A file that is not a JSON
    /// object of short code to non-empty URL is rejected.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let read_path = path.clone();
        let table = tokio::task::spawn_blocking(move || read_table(&read_path))
            .await
            .map_err(join_error)??;

        info!(path = %path.display(), entries = table.len(), "loaded url mappings");

        Ok(Self {
            path,
            table: RwLock::new(table),
            writer: Mutex::new(()),
        })
    }

    /// Returns the canonical location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of every stored mapping.
    pub fn entries(&self) -> BTreeMap<ShortCode, String> {
        self.table.read().clone()
    }

    /// Writes the full current table to disk, replacing the file atomically.
    pub async fn persist(&self) -> Result<()> {
        let _guard = self.writer.lock().await;
        let contents = encode(&self.table.read())?;
        self.write_contents(contents).await
    }

    async fn write_contents(&self, contents: Vec<u8>) -> Result<()> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(join_error)??;

        debug!(path = %self.path.display(), "persisted url mappings");
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for JsonFileRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self.table.read().get(code).cloned())
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.table.read().contains_key(code))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.table.read().len())
    }
}

#[async_trait]
impl Repository for JsonFileRepository {
    async fn insert(&self, code: &ShortCode, original_url: String) -> Result<()> {
        let _guard = self.writer.lock().await;

        let mut staged = self.table.read().clone();
        match staged.entry(code.clone()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(original_url);
            }
        }

        let contents = encode(&staged)?;
        if let Err(err) = self.write_contents(contents).await {
            error!(code = %code, path = %self.path.display(), error = %err, "failed to persist url mappings");
            return Err(err);
        }

        // `writer` is still held, so nothing has changed the table since it was copied.
        *self.table.write() = staged;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<BTreeMap<ShortCode, String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(err.into()),
    };

    let table: BTreeMap<ShortCode, String> = serde_json::from_slice(&bytes)
        .map_err(|e| StorageError::InvalidData(format!("{}: {e}", path.display())))?;

    if let Some((code, _)) = table.iter().find(|(_, url)| url.is_empty()) {
        return Err(StorageError::InvalidData(format!(
            "{}: empty url for short code '{}'",
            path.display(),
            code
        )));
    }

    Ok(table)
}

fn encode(table: &BTreeMap<ShortCode, String>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    table
        .serialize(&mut serializer)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // The temp file must live on the same filesystem for the rename to be atomic.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::from(e.error))?;

    // The rename itself is only durable once the directory is flushed.
    #[cfg(unix)]
    std::fs::File::open(dir)?.sync_all()?;

    Ok(())
}

fn join_error(err: tokio::task::JoinError) -> StorageError {
    StorageError::Io(format!("blocking storage task failed: {err}"))
}
