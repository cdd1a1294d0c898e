use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::error::{AppError, AppResult};
use crate::storage::gateway::StorageGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Exists(String),
    Copy { from: String, to: String },
    Delete(String),
    List { prefix: String, max_items: usize },
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, Vec<u8>>,
    ops: Vec<StorageOp>,
    failing_copies: HashSet<String>,
    failing_deletes: HashSet<String>,
    failing_exists: HashSet<String>,
    fail_listing: bool,
}

/// Bucket held in memory. Lists in key order like S3 does.
#[derive(Debug)]
pub struct MemoryStorage {
    bucket: String,
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn with_objects<I, K>(bucket: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let storage = Self::new(bucket);
        for key in keys {
            storage.put(key, Vec::new());
        }
        storage
    }

    pub fn put(&self, key: impl Into<String>, body: Vec<u8>) {
        self.lock().objects.insert(key.into(), body);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().objects.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn operations(&self) -> Vec<StorageOp> {
        self.lock().ops.clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                StorageOp::Delete(key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fail_copy_from(&self, key: impl Into<String>) {
        self.lock().failing_copies.insert(key.into());
    }

    pub fn fail_delete_of(&self, key: impl Into<String>) {
        self.lock().failing_deletes.insert(key.into());
    }

    pub fn fail_exists_of(&self, key: impl Into<String>) {
        self.lock().failing_exists.insert(key.into());
    }

    pub fn fail_listing(&self) {
        self.lock().fail_listing = true;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl StorageGateway for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn exists(&self, key: &str) -> AppResult<bool> {
        let mut state = self.lock();
        state.ops.push(StorageOp::Exists(key.to_owned()));
        if state.failing_exists.contains(key) {
            return Err(AppError::Storage(format!("head `{key}` failed: access denied")));
        }
        Ok(state.objects.contains_key(key))
    }

    fn copy(&self, source_key: &str, dest_key: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StorageOp::Copy {
            from: source_key.to_owned(),
            to: dest_key.to_owned(),
        });
        if state.failing_copies.contains(source_key) {
            return Err(AppError::Storage(format!("copy `{source_key}` failed")));
        }
        let body = state
            .objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("copy source `{source_key}` missing")))?;
        state.objects.insert(dest_key.to_owned(), body);
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        let mut state = self.lock();
        state.ops.push(StorageOp::Delete(key.to_owned()));
        if state.failing_deletes.contains(key) {
            return Err(AppError::Storage(format!("delete `{key}` failed")));
        }
        state.objects.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str, max_items: usize) -> AppResult<Vec<String>> {
        let mut state = self.lock();
        state.ops.push(StorageOp::List {
            prefix: prefix.to_owned(),
            max_items,
        });
        if state.fail_listing {
            return Err(AppError::Storage(format!("list `{prefix}` failed")));
        }
        let dir = format!("{}/", prefix.trim_end_matches('/'));
        Ok(state
            .objects
            .keys()
            .filter(|key| key.starts_with(&dir))
            .take(max_items)
            .cloned()
            .collect())
    }
}
