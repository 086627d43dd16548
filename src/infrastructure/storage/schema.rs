//! Key layout: one type-tag byte, then big-endian fixed-width ids and raw
//! 32-byte identities, so that prefix iteration over a tag (or a tag plus a
//! status byte) yields exactly that record subset in id order.

use crate::foundation::ConsensusPubKey;

pub const TAG_PARAMS: u8 = 0x01;
pub const TAG_SEQUENCE: u8 = 0x02;

pub const TAG_DKG_REQUEST: u8 = 0x10;
pub const TAG_DKG_STATUS_INDEX: u8 = 0x11;
pub const TAG_DKG_COMPLETION: u8 = 0x12;

pub const TAG_SIGNING_REQUEST: u8 = 0x20;
pub const TAG_SIGNING_STATUS_INDEX: u8 = 0x21;

pub const TAG_REFRESH_REQUEST: u8 = 0x30;
pub const TAG_REFRESH_STATUS_INDEX: u8 = 0x31;
pub const TAG_REFRESH_COMPLETION: u8 = 0x32;

/// Sub-keys of the sequence-counter record, one per numbering space.
pub const SEQ_DKG: u8 = 0x01;
pub const SEQ_SIGNING: u8 = 0x02;
pub const SEQ_REFRESH: u8 = 0x03;

/// Helper to build storage keys consistently.
pub struct KeyBuilder {
    buf: Vec<u8>,
}

impl KeyBuilder {
    pub fn with_capacity(cap: usize) -> Self {
        Self { buf: Vec::with_capacity(cap) }
    }

    pub fn tag(mut self, tag: u8) -> Self {
        self.buf.push(tag);
        self
    }

    pub fn u64_be(mut self, value: u64) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

pub fn params_key() -> Vec<u8> {
    vec![TAG_PARAMS]
}

pub fn sequence_key(space: u8) -> Vec<u8> {
    vec![TAG_SEQUENCE, space]
}

pub fn request_key(tag: u8, id: u64) -> Vec<u8> {
    KeyBuilder::with_capacity(9).tag(tag).u64_be(id).build()
}

pub fn status_index_key(tag: u8, status_byte: u8, id: u64) -> Vec<u8> {
    KeyBuilder::with_capacity(10).tag(tag).tag(status_byte).u64_be(id).build()
}

pub fn status_index_prefix(tag: u8, status_byte: u8) -> Vec<u8> {
    vec![tag, status_byte]
}

pub fn completion_key(tag: u8, request_id: u64, participant: &ConsensusPubKey) -> Vec<u8> {
    KeyBuilder::with_capacity(41).tag(tag).u64_be(request_id).bytes(participant.as_ref()).build()
}

pub fn completion_prefix(tag: u8, request_id: u64) -> Vec<u8> {
    KeyBuilder::with_capacity(9).tag(tag).u64_be(request_id).build()
}

/// Recovers the request id from the trailing 8 bytes of an index key.
pub fn id_from_key_suffix(key: &[u8]) -> Option<u64> {
    let suffix: [u8; 8] = key.get(key.len().checked_sub(8)?..)?.try_into().ok()?;
    Some(u64::from_be_bytes(suffix))
}
