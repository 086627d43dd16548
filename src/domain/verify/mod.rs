//! Signature verification for ceremony completions and signing requests.
//!
//! Scheme dispatch is an exhaustive match over [`SignatureScheme`]; a new
//! scheme cannot be added without extending it here.

mod adaptor;
mod consensus;
mod schnorr;

pub use adaptor::verify_adaptor;
pub use consensus::verify_consensus_signature;
pub use schnorr::{taproot_output_key, verify_schnorr, verify_schnorr_with_commitment, verify_schnorr_with_tweak};

use crate::domain::{SignatureScheme, SigningRequest};
use crate::foundation::{CeremonyError, Result, ADAPTOR_SIGNATURE_SIZE, SCHNORR_SIGNATURE_SIZE};

/// Verifies one signature per sig hash, in order, under the request's scheme.
///
/// The count check and the per-signature size check run before any
/// scheme-specific work, so a truncated or padded signature is reported as
/// malformed rather than as a failed verification.
pub fn verify_signatures(request: &SigningRequest, signatures: &[Vec<u8>]) -> Result<()> {
    if signatures.len() != request.sig_hashes.len() {
        return Err(CeremonyError::SignatureCountMismatch { expected: request.sig_hashes.len(), actual: signatures.len() });
    }

    let expected_len = match &request.scheme {
        SignatureScheme::SchnorrAdaptor { .. } => ADAPTOR_SIGNATURE_SIZE,
        _ => SCHNORR_SIGNATURE_SIZE,
    };
    for (index, signature) in signatures.iter().enumerate() {
        if signature.len() != expected_len {
            return Err(CeremonyError::MalformedSignature {
                scheme: request.scheme.label(),
                index,
                expected_len,
                actual_len: signature.len(),
            });
        }
    }

    for (index, (sig_hash, signature)) in request.sig_hashes.iter().zip(signatures).enumerate() {
        match &request.scheme {
            SignatureScheme::Schnorr => verify_schnorr(&request.pub_key, sig_hash, signature)?,
            SignatureScheme::SchnorrWithTweak { tweak } => verify_schnorr_with_tweak(&request.pub_key, tweak, sig_hash, signature)?,
            SignatureScheme::SchnorrWithCommitment { nonce } => {
                verify_schnorr_with_commitment(&request.pub_key, nonce, sig_hash, signature, index)?
            }
            SignatureScheme::SchnorrAdaptor { adaptor_point } => verify_adaptor(&request.pub_key, adaptor_point, sig_hash, signature)?,
        }
    }
    Ok(())
}
