use crate::foundation::{CeremonyError, Result};
use crate::infrastructure::storage::KvStore;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Ordered in-memory store. The `BTreeMap` gives the byte-lexicographic
/// iteration order the `KvStore` contract requires.
pub struct MemoryKvStore {
    inner: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(BTreeMap::new()) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.inner
            .lock()
            .map_err(|_| CeremonyError::StorageError { operation: "memory store lock".to_string(), details: "poisoned".to_string() })
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.lock_inner()?.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.lock_inner()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.lock_inner()?.remove(key);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.lock_inner()?.contains_key(key))
    }

    fn iterate_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let inner = self.lock_inner()?;
        Ok(inner
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
