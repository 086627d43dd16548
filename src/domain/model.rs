use crate::foundation::{ConsensusPubKey, Hash32};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a DKG ceremony request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum DkgStatus {
    Pending,
    Completed,
    Failed,
    TimedOut,
}

impl DkgStatus {
    /// Stable byte used in the status secondary index key.
    pub const fn index_byte(&self) -> u8 {
        match self {
            DkgStatus::Pending => 0,
            DkgStatus::Completed => 1,
            DkgStatus::Failed => 2,
            DkgStatus::TimedOut => 3,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DkgStatus::Pending => "Pending",
            DkgStatus::Completed => "Completed",
            DkgStatus::Failed => "Failed",
            DkgStatus::TimedOut => "TimedOut",
        }
    }
}

/// Lifecycle status of a signing request. There is no timeout state: stuck
/// requests are only ever failed through the administrative correction path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum SigningStatus {
    Pending,
    Signed,
    Failed,
}

impl SigningStatus {
    pub const fn index_byte(&self) -> u8 {
        match self {
            SigningStatus::Pending => 0,
            SigningStatus::Signed => 1,
            SigningStatus::Failed => 2,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SigningStatus::Pending => "Pending",
            SigningStatus::Signed => "Signed",
            SigningStatus::Failed => "Failed",
        }
    }
}

/// Lifecycle status of a resharing request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum RefreshStatus {
    Pending,
    Completed,
    TimedOut,
}

impl RefreshStatus {
    pub const fn index_byte(&self) -> u8 {
        match self {
            RefreshStatus::Pending => 0,
            RefreshStatus::Completed => 1,
            RefreshStatus::TimedOut => 2,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RefreshStatus::Pending => "Pending",
            RefreshStatus::Completed => "Completed",
            RefreshStatus::TimedOut => "TimedOut",
        }
    }
}

/// Signature scheme for a signing request. Each variant carries exactly the
/// option data its verification needs, so adding a scheme is a compile-time
/// change enforced by the exhaustive match in `domain::verify`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum SignatureScheme {
    /// Plain BIP340 Schnorr against the request's public key.
    Schnorr,
    /// BIP340 Schnorr against the Taproot output key derived from the
    /// request's public key and the given tweak bytes.
    SchnorrWithTweak { tweak: Vec<u8> },
    /// BIP340 Schnorr whose nonce (the first 32 signature bytes) must equal
    /// the precommitted value.
    SchnorrWithCommitment { nonce: [u8; 32] },
    /// 65-byte adaptor pre-signature bound to the given adaptor point.
    SchnorrAdaptor { adaptor_point: Vec<u8> },
}

impl SignatureScheme {
    pub const fn label(&self) -> &'static str {
        match self {
            SignatureScheme::Schnorr => "schnorr",
            SignatureScheme::SchnorrWithTweak { .. } => "schnorr_with_tweak",
            SignatureScheme::SchnorrWithCommitment { .. } => "schnorr_with_commitment",
            SignatureScheme::SchnorrAdaptor { .. } => "schnorr_adaptor",
        }
    }

    /// The scheme-specific option value, hex-encoded for events and logs.
    pub fn option_value_hex(&self) -> String {
        match self {
            SignatureScheme::Schnorr => String::new(),
            SignatureScheme::SchnorrWithTweak { tweak } => hex::encode(tweak),
            SignatureScheme::SchnorrWithCommitment { nonce } => hex::encode(nonce),
            SignatureScheme::SchnorrAdaptor { adaptor_point } => hex::encode(adaptor_point),
        }
    }
}

/// One DKG ceremony instance.
///
/// The participant list is immutable for the life of the request except
/// through a completed resharing request, which overwrites the list and the
/// threshold in place.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DkgRequest {
    pub id: u64,
    pub module: String,
    pub ceremony_type: String,
    pub intent: u32,
    pub participants: Vec<ConsensusPubKey>,
    pub threshold: u32,
    pub batch_size: u32,
    /// Zero means the request never expires.
    pub expires_at_nanos: u64,
    pub status: DkgStatus,
}

/// One participant's reported DKG outcome. Never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DkgCompletion {
    pub request_id: u64,
    pub sender: String,
    /// Generated group public keys, one per batch slot.
    pub pub_keys: Vec<Vec<u8>>,
    pub consensus_pub_key: ConsensusPubKey,
    /// Detached ed25519 signature over `sha256(id_be8 ‖ concat(pub_keys))`.
    pub signature: Vec<u8>,
}

/// One request to jointly sign a batch of digests with an existing group key.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SigningRequest {
    pub id: u64,
    pub module: String,
    /// Consumer-defined correlation handle tying the request back to the
    /// caller's own domain object.
    pub scoped_id: u64,
    pub scheme: SignatureScheme,
    pub intent: u32,
    pub pub_key: Vec<u8>,
    pub sig_hashes: Vec<Hash32>,
    pub created_at_nanos: u64,
    pub status: SigningStatus,
}

/// One membership/threshold change ceremony tied to a completed DKG request.
///
/// The active participant set is always derived (the referenced DKG's
/// participants minus `removed_participants`), never stored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RefreshingRequest {
    pub id: u64,
    pub dkg_id: u64,
    pub removed_participants: Vec<ConsensusPubKey>,
    pub new_threshold: u32,
    pub expires_at_nanos: u64,
    pub status: RefreshStatus,
}

/// One participant's acknowledgment of a resharing ceremony.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RefreshingCompletion {
    pub request_id: u64,
    pub sender: String,
    pub consensus_pub_key: ConsensusPubKey,
    /// Detached ed25519 signature over `sha256(id_be8 ‖ concat(dkg pub_keys))`.
    pub signature: Vec<u8>,
}
