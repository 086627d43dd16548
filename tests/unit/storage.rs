use crate::fixtures::consensus_key;
use accord_core::domain::{DkgRequest, DkgStatus, SigningRequest, SigningStatus, SignatureScheme};
use accord_core::foundation::CeremonyError;
use accord_core::infrastructure::storage::{CeremonyStore, KvStore, MemoryKvStore, Page};
use std::sync::Arc;

fn store() -> (CeremonyStore, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    (CeremonyStore::new(kv.clone()), kv)
}

fn dkg_request(id: u64, status: DkgStatus) -> DkgRequest {
    DkgRequest {
        id,
        module: "custody".to_string(),
        ceremony_type: "vault".to_string(),
        intent: 0,
        participants: vec![consensus_key(1), consensus_key(2)],
        threshold: 2,
        batch_size: 1,
        expires_at_nanos: 0,
        status,
    }
}

fn signing_request(id: u64) -> SigningRequest {
    SigningRequest {
        id,
        module: "custody".to_string(),
        scoped_id: id,
        scheme: SignatureScheme::Schnorr,
        intent: 0,
        pub_key: vec![0x02; 33],
        sig_hashes: vec![[1; 32]],
        created_at_nanos: 0,
        status: SigningStatus::Pending,
    }
}

#[test]
fn test_sequences_are_independent_and_one_based() {
    let (store, _) = store();
    assert_eq!(store.next_dkg_id().unwrap(), 1);
    assert_eq!(store.next_dkg_id().unwrap(), 2);
    assert_eq!(store.next_signing_id().unwrap(), 1);
    assert_eq!(store.next_refreshing_id().unwrap(), 1);
    assert_eq!(store.next_dkg_id().unwrap(), 3);
}

#[test]
fn test_status_index_follows_every_transition() {
    let (store, _) = store();
    store.write_dkg_request(&dkg_request(1, DkgStatus::Pending)).unwrap();
    store.write_dkg_request(&dkg_request(2, DkgStatus::Pending)).unwrap();
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Pending).unwrap(), vec![1, 2]);

    store.write_dkg_request(&dkg_request(1, DkgStatus::Completed)).unwrap();
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Pending).unwrap(), vec![2]);
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Completed).unwrap(), vec![1]);
}

#[test]
fn test_terminal_status_write_is_rejected() {
    let (store, _) = store();
    store.write_dkg_request(&dkg_request(1, DkgStatus::Pending)).unwrap();
    store.write_dkg_request(&dkg_request(1, DkgStatus::TimedOut)).unwrap();
    let err = store.write_dkg_request(&dkg_request(1, DkgStatus::Pending)).unwrap_err();
    assert!(matches!(err, CeremonyError::InvalidStatusTransition { .. }));
    // The failed write must not disturb the index.
    assert_eq!(store.dkg_ids_by_status(DkgStatus::TimedOut).unwrap(), vec![1]);
    assert!(store.dkg_ids_by_status(DkgStatus::Pending).unwrap().is_empty());
}

#[test]
fn test_ids_come_back_ascending_and_paginated() {
    let (store, _) = store();
    for id in [3u64, 1, 2, 10] {
        store.write_dkg_request(&dkg_request(id, DkgStatus::Pending)).unwrap();
    }
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Pending).unwrap(), vec![1, 2, 3, 10]);

    let page = store.list_dkg_requests_by_status(DkgStatus::Pending, Page { offset: 1, limit: 2 }).unwrap();
    assert_eq!(page.iter().map(|request| request.id).collect::<Vec<_>>(), vec![2, 3]);

    let rest = store.list_dkg_requests_by_status(DkgStatus::Pending, Page::all()).unwrap();
    assert_eq!(rest.len(), 4);
}

#[test]
fn test_rebuild_status_indexes_recovers_a_wiped_index() {
    let (store, kv) = store();
    store.write_dkg_request(&dkg_request(1, DkgStatus::Pending)).unwrap();
    store.write_dkg_request(&dkg_request(2, DkgStatus::Pending)).unwrap();
    store.write_dkg_request(&dkg_request(2, DkgStatus::Failed)).unwrap();
    store.write_signing_request(&signing_request(5)).unwrap();

    // Corrupt the derived view: drop every index entry, plus a bogus one.
    for (key, _) in kv.iterate_prefix(&[0x11]).unwrap() {
        kv.delete(&key).unwrap();
    }
    let mut bogus = vec![0x11, 0x03];
    bogus.extend_from_slice(&99u64.to_be_bytes());
    kv.set(&bogus, &[]).unwrap();

    store.rebuild_status_indexes().unwrap();
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Pending).unwrap(), vec![1]);
    assert_eq!(store.dkg_ids_by_status(DkgStatus::Failed).unwrap(), vec![2]);
    assert!(store.dkg_ids_by_status(DkgStatus::TimedOut).unwrap().is_empty());
    assert_eq!(store.signing_ids_by_status(SigningStatus::Pending).unwrap(), vec![5]);
}

#[test]
fn test_params_default_until_written() {
    let (store, _) = store();
    assert_eq!(store.params().unwrap(), accord_core::domain::CeremonyParams::default());

    let mut params = accord_core::domain::CeremonyParams::default();
    params.min_participants = 4;
    store.set_params(&params).unwrap();
    assert_eq!(store.params().unwrap().min_participants, 4);
}

#[test]
fn test_completions_list_in_participant_key_order() {
    let (store, _) = store();
    let high = consensus_key(9);
    let low = consensus_key(1);
    let make = |key| accord_core::domain::DkgCompletion {
        request_id: 1,
        sender: "sender".to_string(),
        pub_keys: vec![vec![0x02; 33]],
        consensus_pub_key: key,
        signature: vec![0; 64],
    };
    store.insert_dkg_completion(&make(high)).unwrap();
    store.insert_dkg_completion(&make(low)).unwrap();

    let completions = store.list_dkg_completions(1).unwrap();
    assert_eq!(completions.len(), 2);
    assert!(completions[0].consensus_pub_key.as_bytes() < completions[1].consensus_pub_key.as_bytes());
    let first = store.first_dkg_completion(1).unwrap().unwrap();
    assert_eq!(first.consensus_pub_key, completions[0].consensus_pub_key);
    assert!(store.has_dkg_completion(1, &high).unwrap());
    assert!(!store.has_dkg_completion(2, &high).unwrap());
}
