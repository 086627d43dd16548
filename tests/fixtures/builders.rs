#![allow(dead_code)]

use accord_core::application::{CeremonyEvent, CeremonyHandler, Coordinator, EventSink, HandlerRegistry, SigningCompletion};
use accord_core::domain::{DkgCompletion, DkgRequest};
use accord_core::foundation::{CeremonyError, ConsensusPubKey, Result};
use accord_core::infrastructure::storage::MemoryKvStore;
use std::sync::{Arc, Mutex};

pub const TEST_MODULE: &str = "custody";
pub const HOUR_NANOS: u64 = 60 * 60 * 1_000_000_000;
pub const BASE_NANOS: u64 = 1_000;

/// Handler double that records every callback and can be told to reject the
/// business-rule-gated ones.
#[derive(Default)]
pub struct RecordingHandler {
    pub reject_completion_received: bool,
    pub reject_completed: bool,
    pub reject_signing: bool,
    pub completed: Mutex<Vec<(u64, Vec<Vec<u8>>)>>,
    pub timed_out: Mutex<Vec<(u64, Vec<ConsensusPubKey>)>>,
    pub signed: Mutex<Vec<(u64, u64, usize)>>,
}

impl RecordingHandler {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting_completed() -> Self {
        Self { reject_completed: true, ..Self::default() }
    }

    pub fn rejecting_signing() -> Self {
        Self { reject_signing: true, ..Self::default() }
    }

    fn rejection(&self, details: &str) -> CeremonyError {
        CeremonyError::HandlerRejected { module: TEST_MODULE.to_string(), details: details.to_string() }
    }
}

impl CeremonyHandler for RecordingHandler {
    fn on_dkg_completion_received(&self, _request: &DkgRequest, _completion: &DkgCompletion) -> Result<()> {
        if self.reject_completion_received {
            return Err(self.rejection("completion rejected by module"));
        }
        Ok(())
    }

    fn on_dkg_completed(&self, request: &DkgRequest, pub_keys: &[Vec<u8>]) -> Result<()> {
        if self.reject_completed {
            return Err(self.rejection("outcome rejected by module"));
        }
        self.completed.lock().unwrap().push((request.id, pub_keys.to_vec()));
        Ok(())
    }

    fn on_dkg_timed_out(&self, request: &DkgRequest, absent: &[ConsensusPubKey]) -> Result<()> {
        self.timed_out.lock().unwrap().push((request.id, absent.to_vec()));
        Ok(())
    }

    fn on_signing_completed(&self, completion: SigningCompletion<'_>) -> Result<()> {
        if self.reject_signing {
            return Err(self.rejection("signatures rejected by module"));
        }
        self.signed.lock().unwrap().push((completion.request.id, completion.request.scoped_id, completion.signatures.len()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<CeremonyEvent>>,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: CeremonyEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct TestBench {
    pub coordinator: Coordinator,
    pub handler: Arc<RecordingHandler>,
    pub sink: Arc<RecordingSink>,
}

pub fn bench() -> TestBench {
    bench_with_handler(RecordingHandler::accepting())
}

pub fn bench_with_handler(handler: RecordingHandler) -> TestBench {
    let kv = Arc::new(MemoryKvStore::new());
    let handler = Arc::new(handler);
    let mut registry = HandlerRegistry::new();
    registry.register(TEST_MODULE, handler.clone()).expect("register handler");
    let sink = Arc::new(RecordingSink::default());
    let coordinator = Coordinator::with_event_sink(kv, registry, sink.clone());
    TestBench { coordinator, handler, sink }
}
