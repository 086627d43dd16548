use crate::foundation::{CeremonyError, ConsensusPubKey, Hash32, Result, CONSENSUS_SIGNATURE_SIZE};
use ed25519_dalek::{Signature, VerifyingKey};

/// Strict ed25519 verification of a participant's detached completion
/// signature over a 32-byte digest.
pub fn verify_consensus_signature(key: &ConsensusPubKey, digest: &Hash32, signature: &[u8]) -> Result<()> {
    let signature_bytes: [u8; CONSENSUS_SIGNATURE_SIZE] = signature.try_into().map_err(|_| CeremonyError::MalformedSignature {
        scheme: "ed25519",
        index: 0,
        expected_len: CONSENSUS_SIGNATURE_SIZE,
        actual_len: signature.len(),
    })?;
    let verifying_key = VerifyingKey::from_bytes(key.as_bytes())
        .map_err(|err| CeremonyError::MalformedKey { context: "consensus pubkey decode", details: err.to_string() })?;
    verifying_key
        .verify_strict(digest, &Signature::from_bytes(&signature_bytes))
        .map_err(|err| CeremonyError::VerificationFailed { context: "consensus signature", details: err.to_string() })
}
