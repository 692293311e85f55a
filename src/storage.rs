use crate::errors::PersistenceError;
use crate::models::{CheckInEntry, MemoryStore};
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::debug;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const RECENT_LIMIT: usize = 5;
pub const DEFAULT_DATA_PATH: &str = "data/vera_memory.json";
const INDENT: &[u8] = b"    ";

pub trait Clock: Send + Sync {
    fn timestamp_key(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn timestamp_key(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn timestamp_key(&self) -> String {
        self.0.clone()
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self) -> Result<MemoryStore, PersistenceError>;
    async fn save(&self, entry: CheckInEntry) -> Result<String, PersistenceError>;
}

/// Rewritten in full on every save. Assumes a single writer: two processes
/// saving at once can lose entries, and saves within one second share a key.
pub struct FileRecordStore {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, LocalClock)
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self {
            path: path.into(),
            clock: Box::new(clock),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self) -> Result<MemoryStore, PersistenceError> {
        load_document(&self.path).await
    }

    async fn save(&self, entry: CheckInEntry) -> Result<String, PersistenceError> {
        let mut store = load_document(&self.path).await?;
        let key = self.clock.timestamp_key();
        store.insert(key.clone(), entry);
        persist_document(&self.path, &store).await?;
        debug!(path = %self.path.display(), %key, entries = store.len(), "check-in saved");
        Ok(key)
    }
}

pub struct InMemoryRecordStore {
    entries: Mutex<MemoryStore>,
    clock: Box<dyn Clock>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_clock(LocalClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            entries: Mutex::new(MemoryStore::new()),
            clock: Box::new(clock),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self) -> Result<MemoryStore, PersistenceError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entry: CheckInEntry) -> Result<String, PersistenceError> {
        let key = self.clock.timestamp_key();
        self.entries.lock().await.insert(key.clone(), entry);
        Ok(key)
    }
}

pub async fn load_document(path: &Path) -> Result<MemoryStore, PersistenceError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(MemoryStore::new()),
        Err(source) => Err(PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub async fn persist_document(path: &Path, store: &MemoryStore) -> Result<(), PersistenceError> {
    let payload = encode_pretty(store)?;
    fs::write(path, payload)
        .await
        .map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn encode_pretty(store: &MemoryStore) -> Result<Vec<u8>, PersistenceError> {
    let mut payload = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut payload, formatter);
    store
        .serialize(&mut serializer)
        .map_err(PersistenceError::Encode)?;
    Ok(payload)
}

pub fn recent_entries(store: &MemoryStore, limit: usize) -> Vec<(String, CheckInEntry)> {
    store
        .iter()
        .rev()
        .take(limit)
        .map(|(timestamp, entry)| (timestamp.clone(), entry.clone()))
        .collect()
}
