//! Key reconciliation as seen through the progress reporter.

#![allow(clippy::expect_used)]

use dodocker_cli::application::services::credentials::ensure_key_pair;
use dodocker_cli::domain::KeyRecord;

use crate::fakes::{FakeCloud, FakeKeys, MockReporter, Recorder, fingerprint_of};

#[tokio::test]
async fn matching_pair_is_reused_without_registering() {
    let cloud = FakeCloud::default().with_key(KeyRecord {
        id: 3,
        name: "dodocker".into(),
        fingerprint: fingerprint_of("ssh-rsa AAAA dodocker"),
    });
    let keys = FakeKeys::with("dodocker", "ssh-rsa AAAA dodocker");
    let mut reporter = MockReporter::new();
    reporter
        .expect_step()
        .withf(|m: &str| m == "Ensuring key exists")
        .times(1)
        .return_const(());
    reporter.expect_warn().never();
    reporter.expect_success().never();

    let pair = ensure_key_pair(&cloud, &keys, "dodocker", &reporter)
        .await
        .expect("ensure");

    assert_eq!(pair.registration_id, 3);
    assert_eq!(pair.name, "dodocker");
}

#[tokio::test]
async fn stale_registration_is_warned_about_once_and_replaced() {
    let cloud = FakeCloud::default().with_key(KeyRecord {
        id: 3,
        name: "dodocker".into(),
        fingerprint: "de:ad:be:ef".into(),
    });
    let keys = FakeKeys::with("dodocker", "ssh-rsa AAAA dodocker");
    let mut reporter = MockReporter::new();
    reporter.expect_step().return_const(());
    reporter
        .expect_warn()
        .withf(|m: &str| m.contains("differs") && m.ends_with("replacing key"))
        .times(1)
        .return_const(());
    reporter.expect_success().return_const(());

    let pair = ensure_key_pair(&cloud, &keys, "dodocker", &reporter)
        .await
        .expect("ensure");

    assert_eq!(*cloud.deregistered.borrow(), vec![3]);
    assert_eq!(keys.generated.get(), 1);
    assert_eq!(cloud.keys.borrow().len(), 1);
    assert_eq!(cloud.keys.borrow()[0].fingerprint, pair.fingerprint);
}

#[tokio::test]
async fn repeated_calls_register_once() {
    let cloud = FakeCloud::default();
    let keys = FakeKeys::default();
    let reporter = Recorder::default();

    for _ in 0..3 {
        ensure_key_pair(&cloud, &keys, "dodocker", &reporter)
            .await
            .expect("ensure");
    }

    assert_eq!(cloud.registered.borrow().len(), 1);
    assert_eq!(keys.generated.get(), 1);
    assert_eq!(reporter.count("Adding key to DigitalOcean"), 1);
    assert!(!reporter.saw("warn:"));
}
