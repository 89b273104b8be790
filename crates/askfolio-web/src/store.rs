//! Flat JSON-array files. Every write rewrites the whole file, so each file
//! has its own lock.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

pub struct JsonArrayFile {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Whether an upsert replaced an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

impl JsonArrayFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the first record whose `key` equals the new record's, or
    /// append it.
    pub async fn upsert(&self, key: &str, record: Value) -> std::io::Result<Upsert> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await;

        let outcome = match records.iter_mut().find(|r| r.get(key) == record.get(key)) {
            Some(existing) => {
                *existing = record;
                Upsert::Updated
            }
            None => {
                records.push(record);
                Upsert::Inserted
            }
        };

        self.write_unlocked(&records).await?;
        Ok(outcome)
    }

    /// Append a record; returns the new record count.
    pub async fn append(&self, record: Value) -> std::io::Result<usize> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked().await;
        records.push(record);
        self.write_unlocked(&records).await?;
        Ok(records.len())
    }

    pub async fn read_all(&self) -> Vec<Value> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    /// Missing or corrupt files read as empty.
    async fn read_unlocked(&self) -> Vec<Value> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            _ => {
                tracing::warn!(path = %self.path.display(), "store file is not a JSON array, starting over");
                Vec::new()
            }
        }
    }

    async fn write_unlocked(&self, records: &[Value]) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json).await
    }
}
