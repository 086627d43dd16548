use crate::application::registry::SigningCompletion;
use crate::application::{CeremonyEvent, Coordinator};
use crate::domain::verify;
use crate::domain::{SignatureScheme, SigningRequest, SigningStatus};
use crate::foundation::{CeremonyError, Hash32, Result};
use log::info;

impl Coordinator {
    /// Creates a signing request over a batch of digests. Signing requests
    /// carry no expiration and are never touched by the per-cycle sweep;
    /// stuck requests are only ever failed through the administrative
    /// correction path.
    pub fn initiate_signing(
        &self,
        module: impl Into<String>,
        scoped_id: u64,
        scheme: SignatureScheme,
        intent: u32,
        pub_key: Vec<u8>,
        sig_hashes: Vec<Hash32>,
        now_nanos: u64,
    ) -> Result<SigningRequest> {
        let request = SigningRequest {
            id: self.store.next_signing_id()?,
            module: module.into(),
            scoped_id,
            scheme,
            intent,
            pub_key,
            sig_hashes,
            created_at_nanos: now_nanos,
            status: SigningStatus::Pending,
        };
        self.store.write_signing_request(&request)?;
        info!(
            "signing initiated id={} module={} scoped_id={} scheme={} sig_hashes={}",
            request.id,
            request.module,
            request.scoped_id,
            request.scheme.label(),
            request.sig_hashes.len()
        );
        self.events.emit(CeremonyEvent::SigningInitiated {
            id: request.id,
            module: request.module.clone(),
            scoped_id: request.scoped_id,
            scheme: request.scheme.label().to_string(),
            option_value: request.scheme.option_value_hex(),
            pub_key: hex::encode(&request.pub_key),
            sig_hashes: request.sig_hashes.iter().map(hex::encode).collect(),
        });
        Ok(request)
    }

    /// Verifies one signature per sig hash under the request's scheme.
    pub fn verify_signatures(&self, request: &SigningRequest, signatures: &[Vec<u8>]) -> Result<()> {
        verify::verify_signatures(request, signatures)
    }

    /// Message entry point: the jointly produced signatures for a pending
    /// request. Verification and the owning module's callback both gate the
    /// transition; any failure leaves the request Pending with no state
    /// change.
    pub fn submit_signatures(&self, sender: &str, id: u64, signatures: &[Vec<u8>]) -> Result<()> {
        let mut request = self.store.get_signing_request(id)?.ok_or(CeremonyError::SigningRequestNotFound { id })?;
        if request.status != SigningStatus::Pending {
            return Err(CeremonyError::InvalidStatus {
                entity: "signing",
                id,
                status: request.status.as_str().to_string(),
                expected: "Pending",
            });
        }
        verify::verify_signatures(&request, signatures)?;

        let handler = self
            .registry
            .get(&request.module)
            .ok_or_else(|| CeremonyError::HandlerNotFound { module: request.module.clone() })?;
        handler
            .on_signing_completed(SigningCompletion { sender, request: &request, signatures })
            .map_err(|err| CeremonyError::HandlerRejected { module: request.module.clone(), details: err.to_string() })?;

        request.status = SigningStatus::Signed;
        self.store.write_signing_request(&request)?;
        info!("signing completed id={} module={} scoped_id={} sender={}", id, request.module, request.scoped_id, sender);
        self.events.emit(CeremonyEvent::SigningCompleted { id, module: request.module, scoped_id: request.scoped_id });
        Ok(())
    }
}
