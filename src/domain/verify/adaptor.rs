use crate::domain::hashes::tagged_hash;
use crate::domain::verify::schnorr::xonly_from_bytes;
use crate::foundation::{CeremonyError, Hash32, Result, COMPRESSED_POINT_SIZE};
use secp256k1::{Parity, PublicKey, Scalar, Secp256k1, SecretKey};

/// Verifies a 65-byte adaptor pre-signature `R0(33) ‖ s(32)` against the
/// adaptor point `T`.
///
/// With `Re = R0 + T` as the effective nonce, the challenge is the BIP340
/// binding `e = tagged_hash("BIP0340/challenge", Re.x ‖ P.x ‖ m)` and the
/// pre-signature is valid iff `s·G == R0 + e·P`, `P` lifted with even y.
/// Revealing the discrete log of `T` later completes `s` into a signature
/// under the effective nonce.
pub fn verify_adaptor(pub_key: &[u8], adaptor_point: &[u8], sig_hash: &Hash32, signature: &[u8]) -> Result<()> {
    let secp = Secp256k1::new();

    if adaptor_point.len() != COMPRESSED_POINT_SIZE {
        return Err(CeremonyError::MalformedKey {
            context: "adaptor point decode",
            details: format!("expected {} bytes, got {}", COMPRESSED_POINT_SIZE, adaptor_point.len()),
        });
    }
    let adaptor = PublicKey::from_slice(adaptor_point)
        .map_err(|err| CeremonyError::MalformedKey { context: "adaptor point decode", details: err.to_string() })?;

    let nonce_point = PublicKey::from_slice(&signature[..COMPRESSED_POINT_SIZE])
        .map_err(|err| CeremonyError::VerificationFailed { context: "adaptor nonce decode", details: err.to_string() })?;
    let scalar = SecretKey::from_slice(&signature[COMPRESSED_POINT_SIZE..])
        .map_err(|err| CeremonyError::VerificationFailed { context: "adaptor scalar decode", details: err.to_string() })?;

    let effective_nonce = nonce_point
        .combine(&adaptor)
        .map_err(|err| CeremonyError::VerificationFailed { context: "adaptor nonce combine", details: err.to_string() })?;

    let verify_key = PublicKey::from_x_only_public_key(xonly_from_bytes(pub_key)?, Parity::Even);
    let challenge = tagged_hash(
        "BIP0340/challenge",
        &[&effective_nonce.x_only_public_key().0.serialize(), &verify_key.x_only_public_key().0.serialize(), sig_hash],
    );
    let challenge = Scalar::from_be_bytes(challenge)
        .map_err(|err| CeremonyError::VerificationFailed { context: "adaptor challenge scalar", details: err.to_string() })?;

    // s·G on the left, R0 + e·P on the right.
    let lhs = scalar.public_key(&secp);
    let rhs = verify_key
        .mul_tweak(&secp, &challenge)
        .and_then(|challenge_term| nonce_point.combine(&challenge_term))
        .map_err(|err| CeremonyError::VerificationFailed { context: "adaptor equation", details: err.to_string() })?;

    if lhs != rhs {
        return Err(CeremonyError::VerificationFailed {
            context: "adaptor",
            details: "pre-signature does not satisfy the adaptor equation".to_string(),
        });
    }
    Ok(())
}
