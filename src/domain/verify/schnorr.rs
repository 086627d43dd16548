use crate::domain::hashes::tagged_hash;
use crate::foundation::{CeremonyError, Hash32, Result, COMPRESSED_POINT_SIZE, XONLY_PUBKEY_SIZE};
use secp256k1::schnorr::Signature;
use secp256k1::{Message, Scalar, Secp256k1, XOnlyPublicKey};
use subtle::ConstantTimeEq;

/// Accepts a verification key as either a 32-byte x-only key or a 33-byte
/// compressed point (the x-only form is taken).
pub(crate) fn xonly_from_bytes(pub_key: &[u8]) -> Result<XOnlyPublicKey> {
    match pub_key.len() {
        XONLY_PUBKEY_SIZE => XOnlyPublicKey::from_slice(pub_key)
            .map_err(|err| CeremonyError::MalformedKey { context: "x-only pubkey decode", details: err.to_string() }),
        COMPRESSED_POINT_SIZE => secp256k1::PublicKey::from_slice(pub_key)
            .map(|point| point.x_only_public_key().0)
            .map_err(|err| CeremonyError::MalformedKey { context: "compressed pubkey decode", details: err.to_string() }),
        other => Err(CeremonyError::MalformedKey { context: "pubkey decode", details: format!("unexpected key length {other}") }),
    }
}

fn verify_against(key: &XOnlyPublicKey, sig_hash: &Hash32, signature: &[u8]) -> Result<()> {
    let secp = Secp256k1::verification_only();
    let signature = Signature::from_slice(signature)
        .map_err(|err| CeremonyError::VerificationFailed { context: "schnorr signature decode", details: err.to_string() })?;
    let message = Message::from_digest(*sig_hash);
    secp.verify_schnorr(&signature, &message, key)
        .map_err(|err| CeremonyError::VerificationFailed { context: "schnorr", details: err.to_string() })
}

/// Plain BIP340 verification against the raw request key.
pub fn verify_schnorr(pub_key: &[u8], sig_hash: &Hash32, signature: &[u8]) -> Result<()> {
    verify_against(&xonly_from_bytes(pub_key)?, sig_hash, signature)
}

/// Taproot output-key derivation: `internal + tagged_hash("TapTweak",
/// internal.x ‖ tweak) · G`. The tweak bytes are the caller's script
/// commitment and may be empty.
pub fn taproot_output_key(pub_key: &[u8], tweak: &[u8]) -> Result<XOnlyPublicKey> {
    let secp = Secp256k1::verification_only();
    let internal = xonly_from_bytes(pub_key)?;
    let tweak_digest = tagged_hash("TapTweak", &[&internal.serialize(), tweak]);
    let scalar = Scalar::from_be_bytes(tweak_digest)
        .map_err(|err| CeremonyError::VerificationFailed { context: "taproot tweak scalar", details: err.to_string() })?;
    let (output_key, _parity) = internal
        .add_tweak(&secp, &scalar)
        .map_err(|err| CeremonyError::VerificationFailed { context: "taproot tweak", details: err.to_string() })?;
    Ok(output_key)
}

/// BIP340 verification against the Taproot output key derived from the
/// request key and the tweak bytes.
pub fn verify_schnorr_with_tweak(pub_key: &[u8], tweak: &[u8], sig_hash: &Hash32, signature: &[u8]) -> Result<()> {
    verify_against(&taproot_output_key(pub_key, tweak)?, sig_hash, signature)
}

/// BIP340 verification with a nonce precommitment: the first 32 signature
/// bytes (R.x) must equal the committed nonce exactly.
pub fn verify_schnorr_with_commitment(pub_key: &[u8], nonce: &[u8; 32], sig_hash: &Hash32, signature: &[u8], index: usize) -> Result<()> {
    if !bool::from(signature[..32].ct_eq(nonce)) {
        return Err(CeremonyError::NonceCommitmentMismatch { index });
    }
    verify_against(&xonly_from_bytes(pub_key)?, sig_hash, signature)
}
