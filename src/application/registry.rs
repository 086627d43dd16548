use crate::domain::{DkgCompletion, DkgRequest, SigningRequest};
use crate::foundation::{CeremonyError, ConsensusPubKey, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Context handed to a consumer module when one of its signing requests is
/// fully signed: the transaction sender, the request (carrying the scoped id,
/// ceremony intent, scheme, and target key), and the verified signatures.
pub struct SigningCompletion<'a> {
    pub sender: &'a str,
    pub request: &'a SigningRequest,
    pub signatures: &'a [Vec<u8>],
}

/// Callbacks a consumer module registers to observe its own ceremonies.
///
/// `on_dkg_completion_received` and `on_signing_completed` run inside the
/// submitting message: an error vetoes the submission and nothing is
/// persisted. `on_dkg_completed` runs inside the per-cycle sweep: an error is
/// the module's business rejection of the outcome and fails the request.
/// `on_dkg_timed_out` is advisory; its error is logged and the request still
/// times out.
pub trait CeremonyHandler: Send + Sync {
    fn on_dkg_completion_received(&self, _request: &DkgRequest, _completion: &DkgCompletion) -> Result<()> {
        Ok(())
    }

    fn on_dkg_completed(&self, _request: &DkgRequest, _pub_keys: &[Vec<u8>]) -> Result<()> {
        Ok(())
    }

    fn on_dkg_timed_out(&self, _request: &DkgRequest, _absent: &[ConsensusPubKey]) -> Result<()> {
        Ok(())
    }

    fn on_signing_completed(&self, _completion: SigningCompletion<'_>) -> Result<()> {
        Ok(())
    }
}

/// Process-lifetime table mapping a consumer-module name to its handler.
/// Populated once at composition time, read-only afterwards; registering the
/// same module twice is rejected so wiring mistakes surface at startup.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn CeremonyHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    pub fn register(&mut self, module: impl Into<String>, handler: Arc<dyn CeremonyHandler>) -> Result<()> {
        let module = module.into();
        if self.handlers.contains_key(&module) {
            return Err(CeremonyError::HandlerAlreadyRegistered { module });
        }
        self.handlers.insert(module, handler);
        Ok(())
    }

    pub fn get(&self, module: &str) -> Option<&Arc<dyn CeremonyHandler>> {
        self.handlers.get(module)
    }
}
