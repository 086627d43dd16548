//! System-wide constants for ceremony coordination.

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Nanoseconds per hour.
pub const NANOS_PER_HOUR: u64 = 60 * 60 * NANOS_PER_SECOND;

/// Default ceremony timeout applied when an initiator passes zero (24 hours).
pub const DEFAULT_CEREMONY_TIMEOUT_NANOS: u64 = 24 * NANOS_PER_HOUR;

/// BIP340 Schnorr signature size in bytes.
pub const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Adaptor pre-signature size in bytes (33-byte compressed nonce point + 32-byte scalar).
pub const ADAPTOR_SIGNATURE_SIZE: usize = 65;

/// Compressed secp256k1 point size in bytes.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// X-only secp256k1 public key size in bytes.
pub const XONLY_PUBKEY_SIZE: usize = 32;

/// Precommitted nonce size in bytes (the R.x half of a Schnorr signature).
pub const NONCE_SIZE: usize = 32;

/// Ed25519 consensus public key size in bytes.
pub const CONSENSUS_PUBKEY_SIZE: usize = 32;

/// Ed25519 consensus signature size in bytes.
pub const CONSENSUS_SIGNATURE_SIZE: usize = 64;

/// SHA-256 digest size in bytes.
pub const HASH_SIZE: usize = 32;

/// Default minimum number of ceremony participants.
pub const DEFAULT_MIN_PARTICIPANTS: u32 = 2;

/// Default minimum signing threshold.
pub const DEFAULT_MIN_THRESHOLD: u32 = 2;

/// Default threshold-to-participant ratio floor, as a fraction (2/3).
pub const DEFAULT_THRESHOLD_RATIO_NUM: u32 = 2;
pub const DEFAULT_THRESHOLD_RATIO_DEN: u32 = 3;
