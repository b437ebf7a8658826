//! Integration tests for stamp rotation under concurrency.

mod helpers;

use std::sync::Arc;

use chrono::Duration;

use tenantgate_auth::SessionClaims;
use tenantgate_core::ErrorKind;

use helpers::{TestAuth, identity};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotations_converge_on_one_stamp() {
    let auth = TestAuth::new();
    let member = identity("member", None);
    let before = auth.manager.issue(&member).await.expect("issue");

    let mut handles = Vec::new();
    for _ in 0..16 {
        let stamps = Arc::clone(&auth.stamps);
        let id = member.identity_id;
        handles.push(tokio::spawn(async move { stamps.rotate(&id).await }));
    }

    let mut rotated = Vec::new();
    for handle in handles {
        rotated.push(handle.await.expect("join").expect("rotate"));
    }

    let final_stamp = auth.stamps.read(&member.identity_id).await.expect("read");
    assert_eq!(
        rotated.iter().filter(|s| **s == final_stamp).count(),
        1,
        "exactly one rotation's value survives"
    );

    let err = auth.manager.verify(&before.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Revoked);

    // A token signed against any superseded intermediate stamp is dead too.
    for stamp in rotated.into_iter().filter(|s| *s != final_stamp) {
        let claims = SessionClaims::new(
            member.identity_id,
            "member",
            None,
            stamp,
            auth.now(),
            Duration::hours(1),
        );
        let token = auth.tokens.sign(&claims).expect("sign");
        let err = auth.manager.verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Revoked);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_verify_after_revoke_observes_new_stamp() {
    let auth = TestAuth::new();
    let member = identity("member", None);

    for _ in 0..20 {
        let issued = auth.manager.issue(&member).await.expect("issue");
        auth.manager.revoke_all(&member.identity_id).await.expect("revoke");
        let err = auth.manager.verify(&issued.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Revoked);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_first_reads_agree_on_one_stamp() {
    let auth = TestAuth::new();
    let member = identity("member", None);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let stamps = Arc::clone(&auth.stamps);
        let id = member.identity_id;
        handles.push(tokio::spawn(async move { stamps.read(&id).await }));
    }

    let mut seen = Vec::new();
    for handle in handles {
        seen.push(handle.await.expect("join").expect("read"));
    }
    seen.dedup();
    assert_eq!(seen.len(), 1);
}
