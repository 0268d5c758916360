use std::sync::Arc;

use chrono::{Duration, Utc};

use simpleotp_otp::domain::repository::{ApiKeyRepository, OtpRepository};
use simpleotp_otp::error::OtpServiceError;
use simpleotp_otp::infra::db::{DbApiKeyRepository, DbOtpRepository};
use simpleotp_otp::usecase::otp::{VerifyOtpInput, VerifyOtpUseCase};

use crate::helpers::{
    RecordingNotifier, TEST_API_KEY, TEST_WEBHOOK_URL, file_db, test_api_key, test_db, test_otp,
};

#[tokio::test]
async fn should_round_trip_api_key() {
    let repo = DbApiKeyRepository { db: test_db().await };
    let key = test_api_key(Some(TEST_WEBHOOK_URL));

    repo.insert(&key).await.unwrap();

    let found = repo.find_by_key(TEST_API_KEY).await.unwrap().unwrap();
    assert_eq!(found.key, key.key);
    assert_eq!(found.webhook_url.as_deref(), Some(TEST_WEBHOOK_URL));
    assert!(repo.find_by_key("sk_missing").await.unwrap().is_none());
}

#[tokio::test]
async fn should_find_otp_by_code_and_id_or_key() {
    let repo = DbOtpRepository { db: test_db().await };
    let otp = test_otp(Duration::minutes(10));
    repo.insert(&otp).await.unwrap();

    let by_id = repo.find_by_code_and_id(&otp.code, &otp.id).await.unwrap();
    let by_key = repo
        .find_by_code_and_api_key(&otp.code, TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(by_id.unwrap().id, otp.id);
    assert_eq!(by_key.unwrap().id, otp.id);
    assert!(repo.find_by_code_and_id("000000", &otp.id).await.unwrap().is_none());
    assert!(
        repo.find_by_code_and_api_key(&otp.code, "sk_other")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn should_mark_used_only_once() {
    let repo = DbOtpRepository { db: test_db().await };
    let otp = test_otp(Duration::minutes(10));
    repo.insert(&otp).await.unwrap();

    assert!(repo.mark_used(&otp.id).await.unwrap(), "first write wins");
    assert!(!repo.mark_used(&otp.id).await.unwrap(), "second write changes nothing");
    assert!(!repo.mark_used("missing").await.unwrap());

    let stored = repo.find_by_code_and_id(&otp.code, &otp.id).await.unwrap().unwrap();
    assert!(stored.used);
}

#[tokio::test]
async fn should_replace_record_on_update() {
    let repo = DbOtpRepository { db: test_db().await };
    let mut otp = test_otp(Duration::minutes(10));
    repo.insert(&otp).await.unwrap();

    otp.used = true;
    otp.email = None;
    repo.update(&otp).await.unwrap();

    let stored = repo.find_by_code_and_id(&otp.code, &otp.id).await.unwrap().unwrap();
    assert!(stored.used);
    assert!(stored.email.is_none());
}

#[tokio::test]
async fn should_preserve_timestamps() {
    let repo = DbOtpRepository { db: test_db().await };
    let otp = test_otp(Duration::minutes(10));
    repo.insert(&otp).await.unwrap();

    let stored = repo.find_by_code_and_id(&otp.code, &otp.id).await.unwrap().unwrap();
    assert_eq!(stored.expires_at - stored.created_at, Duration::minutes(10));
    assert!(stored.expires_at > Utc::now());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_let_one_of_many_concurrent_verifications_consume_stored_otp() {
    const N: usize = 16;

    let store = file_db(8).await;
    let api_keys = DbApiKeyRepository { db: store.db.clone() };
    let otps = DbOtpRepository { db: store.db.clone() };
    api_keys.insert(&test_api_key(Some(TEST_WEBHOOK_URL))).await.unwrap();
    let otp = test_otp(Duration::minutes(10));
    otps.insert(&otp).await.unwrap();

    let notifier = RecordingNotifier::new();
    let uc = Arc::new(VerifyOtpUseCase {
        api_keys,
        otps: otps.clone(),
        notifier: notifier.clone(),
    });

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..N {
        let uc = Arc::clone(&uc);
        let input = VerifyOtpInput {
            code: Some(otp.code.clone()),
            id: Some(otp.id.clone()),
            api_key: None,
        };
        tasks.spawn(async move { uc.execute(input).await });
    }

    let mut successes = 0;
    let mut already_used = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => successes += 1,
            Err(OtpServiceError::AlreadyUsed) => already_used += 1,
            Err(e) => panic!("unexpected rejection: {e:?}"),
        }
    }

    assert_eq!(successes, 1, "exactly one verify should win");
    assert_eq!(already_used, N - 1);
    assert_eq!(notifier.sent().len(), 1, "exactly one webhook dispatch");
    let stored = otps.find_by_code_and_id(&otp.code, &otp.id).await.unwrap().unwrap();
    assert!(stored.used);
}
