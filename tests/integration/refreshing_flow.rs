use crate::fixtures::{bench, consensus_key, sign_completion, TestBench, BASE_NANOS, HOUR_NANOS, TEST_MODULE};
use accord_core::application::CeremonyEvent;
use accord_core::domain::hashes::completion_digest;
use accord_core::domain::{DkgStatus, RefreshStatus};
use accord_core::foundation::{ConsensusPubKey, ErrorCode};
use ed25519_dalek::Signer;

fn batch() -> Vec<Vec<u8>> {
    vec![vec![0x02; 33]]
}

/// Drives a 5-participant, threshold-3 DKG to Completed and returns its id.
fn completed_dkg(bench: &TestBench) -> u64 {
    let participants: Vec<ConsensusPubKey> = (1..=5).map(consensus_key).collect();
    let request = bench
        .coordinator
        .initiate_dkg(TEST_MODULE, "vault", 0, participants, 3, 1, HOUR_NANOS, BASE_NANOS)
        .unwrap();
    for seed in 1..=5u8 {
        bench
            .coordinator
            .complete_dkg("sender", request.id, batch(), consensus_key(seed), sign_completion(seed, request.id, &batch()), BASE_NANOS + 1)
            .unwrap();
    }
    bench.coordinator.end_cycle(BASE_NANOS + 2).unwrap();
    assert_eq!(bench.coordinator.store().get_dkg_request(request.id).unwrap().unwrap().status, DkgStatus::Completed);
    request.id
}

/// Signs the resharing acknowledgment digest with a participant's consensus key.
fn sign_refresh(seed: u8, refresh_id: u64) -> Vec<u8> {
    crate::fixtures::consensus_signer(seed).sign(&completion_digest(refresh_id, &batch())).to_bytes().to_vec()
}

#[test]
fn test_scenario_d_policy_rejects_before_any_write() {
    let bench = bench();
    let dkg_id = completed_dkg(&bench);

    let removed: Vec<ConsensusPubKey> = (1..=3).map(consensus_key).collect();
    let err = bench.coordinator.initiate_refreshing(dkg_id, removed, 3, HOUR_NANOS, BASE_NANOS + 3).unwrap_err();
    assert_eq!(err.code(), ErrorCode::PolicyViolation);
    assert!(bench.coordinator.store().refreshing_ids_by_status(RefreshStatus::Pending).unwrap().is_empty());
}

#[test]
fn test_refresh_overwrites_membership_and_threshold_in_place() {
    let bench = bench();
    let dkg_id = completed_dkg(&bench);

    let request = bench.coordinator.initiate_refreshing(dkg_id, vec![consensus_key(5)], 2, HOUR_NANOS, BASE_NANOS + 3).unwrap();
    assert_eq!(request.status, RefreshStatus::Pending);

    // Completions trickle in; the sweep waits for the full remaining set.
    for seed in 1..=3u8 {
        bench
            .coordinator
            .complete_refreshing("sender", request.id, consensus_key(seed), sign_refresh(seed, request.id), BASE_NANOS + 4)
            .unwrap();
    }
    bench.coordinator.end_cycle(BASE_NANOS + 5).unwrap();
    assert_eq!(bench.coordinator.store().get_refreshing_request(request.id).unwrap().unwrap().status, RefreshStatus::Pending);

    bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(4), sign_refresh(4, request.id), BASE_NANOS + 6)
        .unwrap();
    bench.coordinator.end_cycle(BASE_NANOS + 7).unwrap();

    assert_eq!(bench.coordinator.store().get_refreshing_request(request.id).unwrap().unwrap().status, RefreshStatus::Completed);
    let dkg = bench.coordinator.store().get_dkg_request(dkg_id).unwrap().unwrap();
    assert_eq!(dkg.participants, (1..=4).map(consensus_key).collect::<Vec<_>>());
    assert_eq!(dkg.threshold, 2);
    assert_eq!(dkg.status, DkgStatus::Completed);

    let events = bench.sink.events.lock().unwrap();
    assert!(events.iter().any(|event| matches!(event, CeremonyEvent::RefreshingCompleted { dkg_id: event_dkg_id, .. } if *event_dkg_id == dkg_id)));
}

#[test]
fn test_refresh_completion_error_ladder() {
    let bench = bench();
    let dkg_id = completed_dkg(&bench);
    let request = bench.coordinator.initiate_refreshing(dkg_id, vec![consensus_key(5)], 2, HOUR_NANOS, BASE_NANOS + 3).unwrap();

    // A removed participant is no longer authorized.
    let err = bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(5), sign_refresh(5, request.id), BASE_NANOS + 4)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    // Wrong digest (signed over a different request id).
    let err = bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(1), sign_refresh(1, request.id + 1), BASE_NANOS + 4)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::VerificationFailed);

    // Success, then duplicate.
    bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(1), sign_refresh(1, request.id), BASE_NANOS + 4)
        .unwrap();
    let err = bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(1), sign_refresh(1, request.id), BASE_NANOS + 4)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    // After expiry no further acknowledgment is accepted.
    let err = bench
        .coordinator
        .complete_refreshing("sender", request.id, consensus_key(2), sign_refresh(2, request.id), BASE_NANOS + 3 + HOUR_NANOS)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Expired);
}

#[test]
fn test_refresh_timeout_has_no_handler_callback() {
    let bench = bench();
    let dkg_id = completed_dkg(&bench);
    let request = bench.coordinator.initiate_refreshing(dkg_id, vec![consensus_key(5)], 2, HOUR_NANOS, BASE_NANOS + 3).unwrap();

    let dkg_timeouts_before = bench.handler.timed_out.lock().unwrap().len();
    bench.coordinator.end_cycle(BASE_NANOS + 3 + HOUR_NANOS).unwrap();

    assert_eq!(bench.coordinator.store().get_refreshing_request(request.id).unwrap().unwrap().status, RefreshStatus::TimedOut);
    // Documented asymmetry with DKG: no timeout callback fires for resharing.
    assert_eq!(bench.handler.timed_out.lock().unwrap().len(), dkg_timeouts_before);
    let events = bench.sink.events.lock().unwrap();
    assert!(events.iter().any(|event| matches!(event, CeremonyEvent::RefreshingTimedOut { id, .. } if *id == request.id)));

    // Membership is untouched.
    let dkg = bench.coordinator.store().get_dkg_request(dkg_id).unwrap().unwrap();
    assert_eq!(dkg.participants.len(), 5);
    assert_eq!(dkg.threshold, 3);
}
