mod ceremony;
mod memory;
pub mod schema;

pub use ceremony::CeremonyStore;
pub use memory::MemoryKvStore;

use crate::foundation::Result;

/// The durable key-value store the surrounding system provides. Keys and
/// values are opaque bytes; iteration is byte-lexicographic over a prefix.
///
/// The engine is the only writer within a state transition, so no batching
/// or locking surface is required here.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;
    fn delete(&self, key: &[u8]) -> Result<()>;

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn iterate_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

/// Page window for list queries. A zero limit means no bound.
#[derive(Clone, Copy, Debug, Default)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub const fn all() -> Self {
        Self { offset: 0, limit: 0 }
    }
}
