use crate::foundation::Hash32;
use sha2::{Digest, Sha256};

/// Digest a participant signs to attest a ceremony outcome:
/// `sha256(request_id_be8 ‖ concat(pub_keys))`.
///
/// The same construction serves resharing acknowledgments, with the
/// resharing request id and the referenced DKG's agreed key batch.
pub fn completion_digest(request_id: u64, pub_keys: &[Vec<u8>]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(request_id.to_be_bytes());
    for pub_key in pub_keys {
        hasher.update(pub_key);
    }
    hasher.finalize().into()
}

/// BIP340-style tagged hash: `sha256(sha256(tag) ‖ sha256(tag) ‖ chunks…)`.
pub fn tagged_hash(tag: &str, chunks: &[&[u8]]) -> Hash32 {
    let tag_digest = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_digest);
    hasher.update(tag_digest);
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}
