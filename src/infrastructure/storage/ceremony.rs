use crate::domain::state_machine::{ensure_dkg_transition, ensure_refresh_transition, ensure_signing_transition};
use crate::domain::{CeremonyParams, DkgCompletion, DkgRequest, DkgStatus, RefreshStatus, RefreshingCompletion, RefreshingRequest,
    SigningRequest, SigningStatus};
use crate::foundation::{ConsensusPubKey, Result};
use crate::infrastructure::storage::schema::{
    completion_key, completion_prefix, id_from_key_suffix, params_key, request_key, sequence_key, status_index_key,
    status_index_prefix, SEQ_DKG, SEQ_REFRESH, SEQ_SIGNING, TAG_DKG_COMPLETION, TAG_DKG_REQUEST, TAG_DKG_STATUS_INDEX,
    TAG_REFRESH_COMPLETION, TAG_REFRESH_REQUEST, TAG_REFRESH_STATUS_INDEX, TAG_SIGNING_REQUEST, TAG_SIGNING_STATUS_INDEX,
};
use crate::infrastructure::storage::{KvStore, Page};
use crate::storage_err;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed record accessors over the external key-value store.
///
/// Every request write funnels through a single helper per request kind that
/// validates the status transition against the stored record and keeps the
/// `(status -> id)` secondary index in sync with the primary write. The index
/// is a derived view; `rebuild_status_indexes` re-derives it from scratch.
pub struct CeremonyStore {
    kv: Arc<dyn KvStore>,
}

impl CeremonyStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn get_record<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.kv.get(key)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    // === Params ===

    pub fn params(&self) -> Result<CeremonyParams> {
        Ok(self.get_record(&params_key())?.unwrap_or_default())
    }

    pub fn set_params(&self, params: &CeremonyParams) -> Result<()> {
        self.kv.set(&params_key(), &Self::encode(params)?)
    }

    // === Sequence counters (independent 1-based numbering spaces) ===

    fn next_id(&self, space: u8) -> Result<u64> {
        let key = sequence_key(space);
        let current = match self.kv.get(&key)? {
            Some(bytes) => {
                let fixed: [u8; 8] = bytes.as_slice().try_into().map_err(|_| storage_err!("sequence decode", "corrupt counter"))?;
                u64::from_be_bytes(fixed)
            }
            None => 0,
        };
        let next = current + 1;
        self.kv.set(&key, &next.to_be_bytes())?;
        Ok(next)
    }

    pub fn next_dkg_id(&self) -> Result<u64> {
        self.next_id(SEQ_DKG)
    }

    pub fn next_signing_id(&self) -> Result<u64> {
        self.next_id(SEQ_SIGNING)
    }

    pub fn next_refreshing_id(&self) -> Result<u64> {
        self.next_id(SEQ_REFRESH)
    }

    // === DKG requests ===

    pub fn get_dkg_request(&self, id: u64) -> Result<Option<DkgRequest>> {
        self.get_record(&request_key(TAG_DKG_REQUEST, id))
    }

    pub fn write_dkg_request(&self, request: &DkgRequest) -> Result<()> {
        trace!("write_dkg_request id={} status={}", request.id, request.status.as_str());
        let old_status = match self.get_dkg_request(request.id)? {
            Some(existing) => {
                ensure_dkg_transition(existing.status, request.status)?;
                Some(existing.status)
            }
            None => None,
        };
        self.kv.set(&request_key(TAG_DKG_REQUEST, request.id), &Self::encode(request)?)?;
        self.swap_status_index(TAG_DKG_STATUS_INDEX, old_status.map(|status| status.index_byte()), request.status.index_byte(), request.id)
    }

    pub fn dkg_ids_by_status(&self, status: DkgStatus) -> Result<Vec<u64>> {
        self.ids_by_status(TAG_DKG_STATUS_INDEX, status.index_byte())
    }

    pub fn list_dkg_requests_by_status(&self, status: DkgStatus, page: Page) -> Result<Vec<DkgRequest>> {
        let ids = paginate(self.dkg_ids_by_status(status)?, page);
        let mut requests = Vec::with_capacity(ids.len());
        for id in ids {
            let request =
                self.get_dkg_request(id)?.ok_or_else(|| storage_err!("dkg status index", format!("index points at missing id {id}")))?;
            requests.push(request);
        }
        Ok(requests)
    }

    // === DKG completions ===

    pub fn has_dkg_completion(&self, request_id: u64, participant: &ConsensusPubKey) -> Result<bool> {
        self.kv.has(&completion_key(TAG_DKG_COMPLETION, request_id, participant))
    }

    pub fn insert_dkg_completion(&self, completion: &DkgCompletion) -> Result<()> {
        let key = completion_key(TAG_DKG_COMPLETION, completion.request_id, &completion.consensus_pub_key);
        self.kv.set(&key, &Self::encode(completion)?)
    }

    /// Completions in participant-key byte order (the iteration order).
    pub fn list_dkg_completions(&self, request_id: u64) -> Result<Vec<DkgCompletion>> {
        self.kv
            .iterate_prefix(&completion_prefix(TAG_DKG_COMPLETION, request_id))?
            .iter()
            .map(|(_, value)| Self::decode(value))
            .collect()
    }

    /// The first completion record in iteration order. For a completed
    /// ceremony every completion carries the identical agreed batch, so any
    /// record is representative; the lowest key keeps the choice
    /// deterministic.
    pub fn first_dkg_completion(&self, request_id: u64) -> Result<Option<DkgCompletion>> {
        match self.kv.iterate_prefix(&completion_prefix(TAG_DKG_COMPLETION, request_id))?.first() {
            Some((_, value)) => Ok(Some(Self::decode(value)?)),
            None => Ok(None),
        }
    }

    // === Signing requests ===

    pub fn get_signing_request(&self, id: u64) -> Result<Option<SigningRequest>> {
        self.get_record(&request_key(TAG_SIGNING_REQUEST, id))
    }

    pub fn write_signing_request(&self, request: &SigningRequest) -> Result<()> {
        trace!("write_signing_request id={} status={}", request.id, request.status.as_str());
        let old_status = match self.get_signing_request(request.id)? {
            Some(existing) => {
                ensure_signing_transition(existing.status, request.status)?;
                Some(existing.status)
            }
            None => None,
        };
        self.kv.set(&request_key(TAG_SIGNING_REQUEST, request.id), &Self::encode(request)?)?;
        self.swap_status_index(
            TAG_SIGNING_STATUS_INDEX,
            old_status.map(|status| status.index_byte()),
            request.status.index_byte(),
            request.id,
        )
    }

    pub fn signing_ids_by_status(&self, status: SigningStatus) -> Result<Vec<u64>> {
        self.ids_by_status(TAG_SIGNING_STATUS_INDEX, status.index_byte())
    }

    pub fn list_signing_requests_by_status(&self, status: SigningStatus, page: Page) -> Result<Vec<SigningRequest>> {
        let ids = paginate(self.signing_ids_by_status(status)?, page);
        let mut requests = Vec::with_capacity(ids.len());
        for id in ids {
            let request = self
                .get_signing_request(id)?
                .ok_or_else(|| storage_err!("signing status index", format!("index points at missing id {id}")))?;
            requests.push(request);
        }
        Ok(requests)
    }

    // === Refreshing requests ===

    pub fn get_refreshing_request(&self, id: u64) -> Result<Option<RefreshingRequest>> {
        self.get_record(&request_key(TAG_REFRESH_REQUEST, id))
    }

    pub fn write_refreshing_request(&self, request: &RefreshingRequest) -> Result<()> {
        trace!("write_refreshing_request id={} status={}", request.id, request.status.as_str());
        let old_status = match self.get_refreshing_request(request.id)? {
            Some(existing) => {
                ensure_refresh_transition(existing.status, request.status)?;
                Some(existing.status)
            }
            None => None,
        };
        self.kv.set(&request_key(TAG_REFRESH_REQUEST, request.id), &Self::encode(request)?)?;
        self.swap_status_index(
            TAG_REFRESH_STATUS_INDEX,
            old_status.map(|status| status.index_byte()),
            request.status.index_byte(),
            request.id,
        )
    }

    pub fn refreshing_ids_by_status(&self, status: RefreshStatus) -> Result<Vec<u64>> {
        self.ids_by_status(TAG_REFRESH_STATUS_INDEX, status.index_byte())
    }

    pub fn list_refreshing_requests_by_status(&self, status: RefreshStatus, page: Page) -> Result<Vec<RefreshingRequest>> {
        let ids = paginate(self.refreshing_ids_by_status(status)?, page);
        let mut requests = Vec::with_capacity(ids.len());
        for id in ids {
            let request = self
                .get_refreshing_request(id)?
                .ok_or_else(|| storage_err!("refreshing status index", format!("index points at missing id {id}")))?;
            requests.push(request);
        }
        Ok(requests)
    }

    // === Refreshing completions ===

    pub fn has_refreshing_completion(&self, request_id: u64, participant: &ConsensusPubKey) -> Result<bool> {
        self.kv.has(&completion_key(TAG_REFRESH_COMPLETION, request_id, participant))
    }

    pub fn insert_refreshing_completion(&self, completion: &RefreshingCompletion) -> Result<()> {
        let key = completion_key(TAG_REFRESH_COMPLETION, completion.request_id, &completion.consensus_pub_key);
        self.kv.set(&key, &Self::encode(completion)?)
    }

    pub fn list_refreshing_completions(&self, request_id: u64) -> Result<Vec<RefreshingCompletion>> {
        self.kv
            .iterate_prefix(&completion_prefix(TAG_REFRESH_COMPLETION, request_id))?
            .iter()
            .map(|(_, value)| Self::decode(value))
            .collect()
    }

    pub fn count_refreshing_completions(&self, request_id: u64) -> Result<usize> {
        Ok(self.kv.iterate_prefix(&completion_prefix(TAG_REFRESH_COMPLETION, request_id))?.len())
    }

    // === Status index maintenance ===

    fn swap_status_index(&self, tag: u8, old_status_byte: Option<u8>, new_status_byte: u8, id: u64) -> Result<()> {
        if let Some(old_byte) = old_status_byte {
            if old_byte == new_status_byte {
                return Ok(());
            }
            self.kv.delete(&status_index_key(tag, old_byte, id))?;
        }
        self.kv.set(&status_index_key(tag, new_status_byte, id), &[])
    }

    /// Ids under one `(tag, status)` prefix, ascending by construction: the
    /// big-endian id suffix makes key order equal id order.
    fn ids_by_status(&self, tag: u8, status_byte: u8) -> Result<Vec<u64>> {
        Ok(self
            .kv
            .iterate_prefix(&status_index_prefix(tag, status_byte))?
            .iter()
            .filter_map(|(key, _)| id_from_key_suffix(key))
            .collect())
    }

    /// Offline recovery path: drops every status index entry and re-derives
    /// the index from the primary records.
    pub fn rebuild_status_indexes(&self) -> Result<()> {
        for tag in [TAG_DKG_STATUS_INDEX, TAG_SIGNING_STATUS_INDEX, TAG_REFRESH_STATUS_INDEX] {
            for (key, _) in self.kv.iterate_prefix(&[tag])? {
                self.kv.delete(&key)?;
            }
        }
        for (_, value) in self.kv.iterate_prefix(&[TAG_DKG_REQUEST])? {
            let request: DkgRequest = Self::decode(&value)?;
            self.kv.set(&status_index_key(TAG_DKG_STATUS_INDEX, request.status.index_byte(), request.id), &[])?;
        }
        for (_, value) in self.kv.iterate_prefix(&[TAG_SIGNING_REQUEST])? {
            let request: SigningRequest = Self::decode(&value)?;
            self.kv.set(&status_index_key(TAG_SIGNING_STATUS_INDEX, request.status.index_byte(), request.id), &[])?;
        }
        for (_, value) in self.kv.iterate_prefix(&[TAG_REFRESH_REQUEST])? {
            let request: RefreshingRequest = Self::decode(&value)?;
            self.kv.set(&status_index_key(TAG_REFRESH_STATUS_INDEX, request.status.index_byte(), request.id), &[])?;
        }
        Ok(())
    }
}

fn paginate(ids: Vec<u64>, page: Page) -> Vec<u64> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let iter = ids.into_iter().skip(offset);
    if page.limit == 0 {
        iter.collect()
    } else {
        iter.take(usize::try_from(page.limit).unwrap_or(usize::MAX)).collect()
    }
}
