use crate::application::{CeremonyEvent, Coordinator};
use crate::domain::hashes::completion_digest;
use crate::domain::quorum::{absent_participants, completions_agree, is_participant};
use crate::domain::timeout::is_expired;
use crate::domain::verify::verify_consensus_signature;
use crate::domain::{DkgCompletion, DkgRequest, DkgStatus};
use crate::foundation::{CeremonyError, ConsensusPubKey, Result};
use log::{debug, info, warn};

impl Coordinator {
    /// Creates a new DKG ceremony request. Participant and threshold policy
    /// is deliberately not enforced here: callers run
    /// `CeremonyParams::check_participant_count` / `check_threshold` before
    /// initiating.
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_dkg(
        &self,
        module: impl Into<String>,
        ceremony_type: impl Into<String>,
        intent: u32,
        participants: Vec<ConsensusPubKey>,
        threshold: u32,
        batch_size: u32,
        timeout_nanos: u64,
        now_nanos: u64,
    ) -> Result<DkgRequest> {
        let params = self.store.params()?;
        let timeout = if timeout_nanos == 0 { params.default_dkg_timeout_nanos } else { timeout_nanos };
        let request = DkgRequest {
            id: self.store.next_dkg_id()?,
            module: module.into(),
            ceremony_type: ceremony_type.into(),
            intent,
            participants,
            threshold,
            batch_size,
            expires_at_nanos: now_nanos.saturating_add(timeout),
            status: DkgStatus::Pending,
        };
        self.store.write_dkg_request(&request)?;
        info!(
            "dkg initiated id={} module={} ceremony_type={} participants={} threshold={} batch_size={} expires_at_nanos={}",
            request.id,
            request.module,
            request.ceremony_type,
            request.participants.len(),
            request.threshold,
            request.batch_size,
            request.expires_at_nanos
        );
        self.events.emit(CeremonyEvent::DkgInitiated {
            id: request.id,
            module: request.module.clone(),
            ceremony_type: request.ceremony_type.clone(),
            participants: request.participants.iter().map(|key| key.to_string()).collect(),
            threshold: request.threshold,
            batch_size: request.batch_size,
            expires_at_nanos: request.expires_at_nanos,
        });
        Ok(request)
    }

    /// Message entry point: one participant reports its ceremony outcome.
    ///
    /// The request's status is untouched; resolution happens only in the
    /// per-cycle sweep. Either everything (callback included) succeeds and
    /// the completion is persisted, or a typed error is returned before any
    /// write.
    pub fn complete_dkg(
        &self,
        sender: impl Into<String>,
        id: u64,
        pub_keys: Vec<Vec<u8>>,
        consensus_pub_key: ConsensusPubKey,
        signature: Vec<u8>,
        now_nanos: u64,
    ) -> Result<()> {
        let request = self.store.get_dkg_request(id)?.ok_or(CeremonyError::DkgRequestNotFound { id })?;
        if request.status != DkgStatus::Pending {
            return Err(CeremonyError::InvalidStatus {
                entity: "dkg",
                id,
                status: request.status.as_str().to_string(),
                expected: "Pending",
            });
        }
        if is_expired(now_nanos, request.expires_at_nanos) {
            return Err(CeremonyError::RequestExpired { id, expired_at_nanos: request.expires_at_nanos, now_nanos });
        }
        if !is_participant(&request.participants, &consensus_pub_key) {
            return Err(CeremonyError::UnauthorizedParticipant { id, participant: consensus_pub_key.to_string() });
        }
        if self.store.has_dkg_completion(id, &consensus_pub_key)? {
            return Err(CeremonyError::CompletionAlreadyExists { id, participant: consensus_pub_key.to_string() });
        }
        if pub_keys.len() != request.batch_size as usize {
            return Err(CeremonyError::BatchSizeMismatch { expected: request.batch_size as usize, actual: pub_keys.len() });
        }
        let digest = completion_digest(id, &pub_keys);
        verify_consensus_signature(&consensus_pub_key, &digest, &signature)?;

        let completion = DkgCompletion { request_id: id, sender: sender.into(), pub_keys, consensus_pub_key, signature };
        let handler = self
            .registry
            .get(&request.module)
            .ok_or_else(|| CeremonyError::HandlerNotFound { module: request.module.clone() })?;
        handler
            .on_dkg_completion_received(&request, &completion)
            .map_err(|err| CeremonyError::HandlerRejected { module: request.module.clone(), details: err.to_string() })?;

        self.store.insert_dkg_completion(&completion)?;
        debug!("dkg completion stored id={} participant={}", id, completion.consensus_pub_key);
        self.events.emit(CeremonyEvent::DkgCompletionReceived {
            id,
            module: request.module,
            participant: completion.consensus_pub_key.to_string(),
        });
        Ok(())
    }

    /// Sweep resolution for one pending DKG request. The timeout check runs
    /// first, so an expired-but-fully-completed ceremony still times out.
    pub(crate) fn resolve_pending_dkg(&self, mut request: DkgRequest, now_nanos: u64) -> Result<()> {
        let completions = self.store.list_dkg_completions(request.id)?;

        if is_expired(now_nanos, request.expires_at_nanos) {
            let absent = absent_participants(&request.participants, &completions);
            request.status = DkgStatus::TimedOut;
            self.store.write_dkg_request(&request)?;
            info!("dkg timed out id={} module={} absent={}", request.id, request.module, absent.len());
            match self.registry.get(&request.module) {
                Some(handler) => {
                    if let Err(err) = handler.on_dkg_timed_out(&request, &absent) {
                        warn!("dkg timeout handler errored id={} module={} error={}", request.id, request.module, err);
                    }
                }
                None => warn!("no handler registered for timed-out dkg id={} module={}", request.id, request.module),
            }
            self.events.emit(CeremonyEvent::DkgTimedOut {
                id: request.id,
                module: request.module.clone(),
                absent: absent.iter().map(|key| key.to_string()).collect(),
            });
            return Ok(());
        }

        if completions.len() < request.participants.len() {
            return Ok(());
        }

        if !completions_agree(&completions) {
            return self.fail_dkg(request, "completion key batches diverged");
        }

        // By agreement, every completion carries the same batch.
        let pub_keys = completions[0].pub_keys.clone();
        match self.registry.get(&request.module) {
            None => self.fail_dkg(request, "no handler registered"),
            Some(handler) => match handler.on_dkg_completed(&request, &pub_keys) {
                Err(err) => {
                    let reason = err.to_string();
                    self.fail_dkg(request, &reason)
                }
                Ok(()) => {
                    request.status = DkgStatus::Completed;
                    self.store.write_dkg_request(&request)?;
                    info!("dkg completed id={} module={} batch_size={}", request.id, request.module, pub_keys.len());
                    self.events.emit(CeremonyEvent::DkgCompleted { id: request.id, module: request.module.clone() });
                    Ok(())
                }
            },
        }
    }

    fn fail_dkg(&self, mut request: DkgRequest, reason: &str) -> Result<()> {
        request.status = DkgStatus::Failed;
        self.store.write_dkg_request(&request)?;
        warn!("dkg failed id={} module={} reason={}", request.id, request.module, reason);
        self.events.emit(CeremonyEvent::DkgFailed { id: request.id, module: request.module.clone(), reason: reason.to_string() });
        Ok(())
    }
}
