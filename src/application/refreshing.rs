use crate::application::{CeremonyEvent, Coordinator};
use crate::domain::hashes::completion_digest;
use crate::domain::quorum::{is_participant, remaining_participants};
use crate::domain::timeout::is_expired;
use crate::domain::verify::verify_consensus_signature;
use crate::domain::{RefreshStatus, RefreshingCompletion, RefreshingRequest};
use crate::foundation::{CeremonyError, ConsensusPubKey, Result};
use crate::storage_err;
use log::{debug, info};

impl Coordinator {
    /// Creates a resharing request for a completed DKG ceremony. The full
    /// admission check runs first, so a policy violation is rejected before
    /// any state is written. Governance authority over this entry point is
    /// the message glue's responsibility.
    pub fn initiate_refreshing(
        &self,
        dkg_id: u64,
        removed_participants: Vec<ConsensusPubKey>,
        new_threshold: u32,
        timeout_nanos: u64,
        now_nanos: u64,
    ) -> Result<RefreshingRequest> {
        let params = self.store.params()?;
        let dkg = self.store.get_dkg_request(dkg_id)?.ok_or(CeremonyError::DkgRequestNotFound { id: dkg_id })?;
        params.check_refresh(&dkg, &removed_participants, new_threshold)?;

        let timeout = if timeout_nanos == 0 { params.default_refresh_timeout_nanos } else { timeout_nanos };
        let request = RefreshingRequest {
            id: self.store.next_refreshing_id()?,
            dkg_id,
            removed_participants,
            new_threshold,
            expires_at_nanos: now_nanos.saturating_add(timeout),
            status: RefreshStatus::Pending,
        };
        self.store.write_refreshing_request(&request)?;
        info!(
            "refreshing initiated id={} dkg_id={} removed={} new_threshold={} expires_at_nanos={}",
            request.id,
            request.dkg_id,
            request.removed_participants.len(),
            request.new_threshold,
            request.expires_at_nanos
        );
        self.events.emit(CeremonyEvent::RefreshingInitiated {
            id: request.id,
            dkg_id: request.dkg_id,
            removed: request.removed_participants.iter().map(|key| key.to_string()).collect(),
            new_threshold: request.new_threshold,
            expires_at_nanos: request.expires_at_nanos,
        });
        Ok(request)
    }

    /// Message entry point: one remaining participant acknowledges the
    /// resharing ceremony. The signed digest binds the resharing id to the
    /// referenced DKG's agreed key batch.
    pub fn complete_refreshing(
        &self,
        sender: impl Into<String>,
        id: u64,
        consensus_pub_key: ConsensusPubKey,
        signature: Vec<u8>,
        now_nanos: u64,
    ) -> Result<()> {
        let request = self.store.get_refreshing_request(id)?.ok_or(CeremonyError::RefreshingRequestNotFound { id })?;
        if request.status != RefreshStatus::Pending {
            return Err(CeremonyError::InvalidStatus {
                entity: "refreshing",
                id,
                status: request.status.as_str().to_string(),
                expected: "Pending",
            });
        }
        if is_expired(now_nanos, request.expires_at_nanos) {
            return Err(CeremonyError::RequestExpired { id, expired_at_nanos: request.expires_at_nanos, now_nanos });
        }
        let dkg = self.store.get_dkg_request(request.dkg_id)?.ok_or(CeremonyError::DkgRequestNotFound { id: request.dkg_id })?;
        let remaining = remaining_participants(&dkg.participants, &request.removed_participants);
        if !is_participant(&remaining, &consensus_pub_key) {
            return Err(CeremonyError::UnauthorizedParticipant { id, participant: consensus_pub_key.to_string() });
        }
        if self.store.has_refreshing_completion(id, &consensus_pub_key)? {
            return Err(CeremonyError::CompletionAlreadyExists { id, participant: consensus_pub_key.to_string() });
        }
        let agreed = self
            .store
            .first_dkg_completion(request.dkg_id)?
            .ok_or_else(|| storage_err!("refreshing digest", format!("completed dkg {} has no completions", request.dkg_id)))?;
        let digest = completion_digest(id, &agreed.pub_keys);
        verify_consensus_signature(&consensus_pub_key, &digest, &signature)?;

        let completion = RefreshingCompletion { request_id: id, sender: sender.into(), consensus_pub_key, signature };
        self.store.insert_refreshing_completion(&completion)?;
        debug!("refreshing completion stored id={} participant={}", id, completion.consensus_pub_key);
        Ok(())
    }

    /// Sweep resolution for one pending resharing request. A timeout is
    /// recorded without any handler callback; once every remaining
    /// participant has acknowledged, the referenced DKG's membership and
    /// threshold are overwritten in place.
    pub(crate) fn resolve_pending_refreshing(&self, mut request: RefreshingRequest, now_nanos: u64) -> Result<()> {
        if is_expired(now_nanos, request.expires_at_nanos) {
            request.status = RefreshStatus::TimedOut;
            self.store.write_refreshing_request(&request)?;
            info!("refreshing timed out id={} dkg_id={}", request.id, request.dkg_id);
            self.events.emit(CeremonyEvent::RefreshingTimedOut { id: request.id, dkg_id: request.dkg_id });
            return Ok(());
        }

        let mut dkg =
            self.store.get_dkg_request(request.dkg_id)?.ok_or(CeremonyError::DkgRequestNotFound { id: request.dkg_id })?;
        let remaining = remaining_participants(&dkg.participants, &request.removed_participants);
        if self.store.count_refreshing_completions(request.id)? < remaining.len() {
            return Ok(());
        }

        request.status = RefreshStatus::Completed;
        self.store.write_refreshing_request(&request)?;
        dkg.participants = remaining;
        dkg.threshold = request.new_threshold;
        self.store.write_dkg_request(&dkg)?;
        info!(
            "refreshing completed id={} dkg_id={} participants={} threshold={}",
            request.id,
            request.dkg_id,
            dkg.participants.len(),
            dkg.threshold
        );
        self.events.emit(CeremonyEvent::RefreshingCompleted { id: request.id, dkg_id: request.dkg_id });
        Ok(())
    }
}
