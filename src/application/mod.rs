mod dkg;
mod events;
mod lifecycle;
mod refreshing;
mod registry;
mod signing;

pub use events::{CeremonyEvent, EventSink, NoopSink, StructuredEventLogger};
pub use registry::{CeremonyHandler, HandlerRegistry, SigningCompletion};

use crate::domain::CeremonyParams;
use crate::foundation::Result;
use crate::infrastructure::storage::{CeremonyStore, KvStore};
use std::sync::Arc;

/// The coordination engine. A pure, synchronous state machine: message entry
/// points and the per-cycle sweep are the only drivers, each runs to
/// completion against the store, and logical time always comes from the
/// caller.
pub struct Coordinator {
    store: CeremonyStore,
    registry: HandlerRegistry,
    events: Arc<dyn EventSink>,
}

impl Coordinator {
    pub fn new(kv: Arc<dyn KvStore>, registry: HandlerRegistry) -> Self {
        Self { store: CeremonyStore::new(kv), registry, events: Arc::new(NoopSink) }
    }

    pub fn with_event_sink(kv: Arc<dyn KvStore>, registry: HandlerRegistry, events: Arc<dyn EventSink>) -> Self {
        Self { store: CeremonyStore::new(kv), registry, events }
    }

    /// Read access for the query surface (by-id and by-status lookups with
    /// pagination).
    pub fn store(&self) -> &CeremonyStore {
        &self.store
    }

    pub fn params(&self) -> Result<CeremonyParams> {
        self.store.params()
    }

    /// Administrative params update. Authority checks are the message glue's
    /// responsibility; the engine only enforces internal consistency.
    pub fn set_params(&self, params: CeremonyParams) -> Result<()> {
        params.validate()?;
        self.store.set_params(&params)
    }
}
