use crate::fixtures::{
    bench, bench_with_handler, schnorr_keypair, schnorr_sign, taproot_tweaked_keypair, xonly_bytes, RecordingHandler, BASE_NANOS,
    HOUR_NANOS, TEST_MODULE,
};
use accord_core::domain::{SignatureScheme, SigningStatus};
use accord_core::foundation::{CeremonyError, ErrorCode, Hash32};

#[test]
fn test_scenario_c_tweaked_signing_round_trip() {
    let bench = bench();
    let keypair = schnorr_keypair(1);
    let tweak = vec![0x00];
    let sig_hashes: Vec<Hash32> = vec![[0x11; 32], [0x22; 32]];

    let request = bench
        .coordinator
        .initiate_signing(
            TEST_MODULE,
            7,
            SignatureScheme::SchnorrWithTweak { tweak: tweak.clone() },
            0,
            xonly_bytes(&keypair),
            sig_hashes.clone(),
            BASE_NANOS,
        )
        .unwrap();
    assert_eq!(request.id, 1);
    assert_eq!(request.status, SigningStatus::Pending);

    let tweaked = taproot_tweaked_keypair(&keypair, &tweak);
    let signatures: Vec<Vec<u8>> = sig_hashes.iter().map(|sig_hash| schnorr_sign(&tweaked, sig_hash)).collect();
    bench.coordinator.submit_signatures("sender", request.id, &signatures).unwrap();

    assert_eq!(bench.coordinator.store().get_signing_request(request.id).unwrap().unwrap().status, SigningStatus::Signed);
    assert_eq!(bench.handler.signed.lock().unwrap().as_slice(), &[(request.id, 7, 2)]);

    // Resubmission against an already-signed request.
    let err = bench.coordinator.submit_signatures("sender", request.id, &signatures).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[test]
fn test_submission_error_ladder() {
    let bench = bench();
    let keypair = schnorr_keypair(2);
    let sig_hash: Hash32 = [0x33; 32];
    let request = bench
        .coordinator
        .initiate_signing(TEST_MODULE, 1, SignatureScheme::Schnorr, 0, xonly_bytes(&keypair), vec![sig_hash], BASE_NANOS)
        .unwrap();

    let err = bench.coordinator.submit_signatures("sender", 99, &[]).unwrap_err();
    assert!(matches!(err, CeremonyError::SigningRequestNotFound { id: 99 }));

    let err = bench.coordinator.submit_signatures("sender", request.id, &[]).unwrap_err();
    assert!(matches!(err, CeremonyError::SignatureCountMismatch { expected: 1, actual: 0 }));

    let err = bench.coordinator.submit_signatures("sender", request.id, &[vec![0u8; 64]]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::VerificationFailed);

    // Nothing above may have moved the request.
    assert_eq!(bench.coordinator.store().get_signing_request(request.id).unwrap().unwrap().status, SigningStatus::Pending);
}

#[test]
fn test_handler_veto_is_atomic() {
    let bench = bench_with_handler(RecordingHandler::rejecting_signing());
    let keypair = schnorr_keypair(3);
    let sig_hash: Hash32 = [0x44; 32];
    let request = bench
        .coordinator
        .initiate_signing(TEST_MODULE, 2, SignatureScheme::Schnorr, 0, xonly_bytes(&keypair), vec![sig_hash], BASE_NANOS)
        .unwrap();

    let signatures = vec![schnorr_sign(&keypair, &sig_hash)];
    let err = bench.coordinator.submit_signatures("sender", request.id, &signatures).unwrap_err();
    assert_eq!(err.code(), ErrorCode::HandlerRejected);

    // The request stays pending and no completion side effects are visible.
    assert_eq!(bench.coordinator.store().get_signing_request(request.id).unwrap().unwrap().status, SigningStatus::Pending);
    assert!(bench.handler.signed.lock().unwrap().is_empty());
}

#[test]
fn test_signing_requests_have_no_timeout() {
    let bench = bench();
    let keypair = schnorr_keypair(4);
    let request = bench
        .coordinator
        .initiate_signing(TEST_MODULE, 3, SignatureScheme::Schnorr, 0, xonly_bytes(&keypair), vec![[0x55; 32]], BASE_NANOS)
        .unwrap();

    // Documented quirk: the sweep never touches signing requests, however
    // much logical time passes.
    bench.coordinator.end_cycle(BASE_NANOS + 1_000 * HOUR_NANOS).unwrap();
    assert_eq!(bench.coordinator.store().get_signing_request(request.id).unwrap().unwrap().status, SigningStatus::Pending);

    // The only way out is the administrative correction.
    let failed = bench.coordinator.fail_pending_signing_requests().unwrap();
    assert_eq!(failed, vec![request.id]);
    assert_eq!(bench.coordinator.store().get_signing_request(request.id).unwrap().unwrap().status, SigningStatus::Failed);

    let signatures = vec![schnorr_sign(&keypair, &[0x55; 32])];
    let err = bench.coordinator.submit_signatures("sender", request.id, &signatures).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[test]
fn test_force_fail_migration_spares_resolved_requests() {
    let bench = bench();
    let keypair = schnorr_keypair(5);
    let sig_hash: Hash32 = [0x66; 32];
    let signed = bench
        .coordinator
        .initiate_signing(TEST_MODULE, 4, SignatureScheme::Schnorr, 0, xonly_bytes(&keypair), vec![sig_hash], BASE_NANOS)
        .unwrap();
    bench.coordinator.submit_signatures("sender", signed.id, &[schnorr_sign(&keypair, &sig_hash)]).unwrap();

    let stuck = bench
        .coordinator
        .initiate_signing(TEST_MODULE, 5, SignatureScheme::Schnorr, 0, xonly_bytes(&keypair), vec![[0x77; 32]], BASE_NANOS)
        .unwrap();

    let failed = bench.coordinator.fail_pending_signing_requests().unwrap();
    assert_eq!(failed, vec![stuck.id]);
    assert_eq!(bench.coordinator.store().get_signing_request(signed.id).unwrap().unwrap().status, SigningStatus::Signed);
    assert_eq!(bench.coordinator.store().get_signing_request(stuck.id).unwrap().unwrap().status, SigningStatus::Failed);
}
