use log::{info, warn};
use serde::Serialize;

/// Structured events emitted at every externally observable transition.
/// Attribute sets mirror what downstream indexers need: ids, the owning
/// module, and the scheme- or ceremony-specific values.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CeremonyEvent {
    DkgInitiated {
        id: u64,
        module: String,
        ceremony_type: String,
        participants: Vec<String>,
        threshold: u32,
        batch_size: u32,
        expires_at_nanos: u64,
    },
    DkgCompletionReceived {
        id: u64,
        module: String,
        participant: String,
    },
    DkgCompleted {
        id: u64,
        module: String,
    },
    DkgFailed {
        id: u64,
        module: String,
        reason: String,
    },
    DkgTimedOut {
        id: u64,
        module: String,
        absent: Vec<String>,
    },
    SigningInitiated {
        id: u64,
        module: String,
        scoped_id: u64,
        scheme: String,
        option_value: String,
        pub_key: String,
        sig_hashes: Vec<String>,
    },
    SigningCompleted {
        id: u64,
        module: String,
        scoped_id: u64,
    },
    SigningFailed {
        id: u64,
        module: String,
    },
    RefreshingInitiated {
        id: u64,
        dkg_id: u64,
        removed: Vec<String>,
        new_threshold: u32,
        expires_at_nanos: u64,
    },
    RefreshingCompleted {
        id: u64,
        dkg_id: u64,
    },
    RefreshingTimedOut {
        id: u64,
        dkg_id: u64,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: CeremonyEvent);
}

pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: CeremonyEvent) {}
}

/// Emits each event as a JSON log line, the shape indexers scrape.
pub struct StructuredEventLogger;

impl EventSink for StructuredEventLogger {
    fn emit(&self, event: CeremonyEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(target: "accord::events", "ceremony event event={}", json),
            Err(err) => warn!("failed to serialize ceremony event error={}", err),
        }
    }
}
