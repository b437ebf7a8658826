//! Integration tests for stamp store retry and fail-closed behaviour.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tenantgate_core::ErrorKind;

use helpers::{FlakyStampStore, TestAuth, identity};

#[tokio::test]
async fn test_transient_read_failures_are_retried() {
    let store = Arc::new(FlakyStampStore::new(0, true));
    let auth = TestAuth::with_store(store.clone());
    let issued = auth
        .manager
        .issue(&identity("member", None))
        .await
        .expect("issue");

    store.fail_next(2);
    assert!(auth.manager.verify(&issued.token).await.is_ok());
}

#[tokio::test]
async fn test_exhausted_retries_fail_closed() {
    let store = Arc::new(FlakyStampStore::new(0, true));
    let auth = TestAuth::with_store(store.clone());
    let issued = auth
        .manager
        .issue(&identity("member", None))
        .await
        .expect("issue");

    store.fail_next(100);
    let reads_before = store.reads.load(Ordering::SeqCst);
    let err = auth.manager.verify(&issued.token).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    let attempts = store.reads.load(Ordering::SeqCst) - reads_before;
    assert_eq!(attempts, auth.config.stamp_store.read_retries + 1);
}

#[tokio::test]
async fn test_non_transient_failures_are_not_retried() {
    let store = Arc::new(FlakyStampStore::new(0, false));
    let auth = TestAuth::with_store(store.clone());
    let issued = auth
        .manager
        .issue(&identity("member", None))
        .await
        .expect("issue");

    store.fail_next(1);
    let reads_before = store.reads.load(Ordering::SeqCst);
    let err = auth.manager.verify(&issued.token).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(store.reads.load(Ordering::SeqCst) - reads_before, 1);
}

#[tokio::test]
async fn test_issue_fails_closed_when_store_is_down() {
    let store = Arc::new(FlakyStampStore::new(100, true));
    let auth = TestAuth::with_store(store);
    let err = auth
        .manager
        .issue(&identity("member", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
}
