use simpleotp_otp::error::OtpServiceError;
use simpleotp_otp::usecase::api_key::{RegisterApiKeyInput, RegisterApiKeyUseCase};

use crate::helpers::{MockApiKeyRepo, TEST_WEBHOOK_URL};

#[tokio::test]
async fn should_register_key_with_webhook() {
    let repo = MockApiKeyRepo::empty();
    let keys_handle = repo.keys_handle();
    let uc = RegisterApiKeyUseCase { api_keys: repo };

    let key = uc
        .execute(RegisterApiKeyInput {
            webhook_url: Some(TEST_WEBHOOK_URL.to_owned()),
        })
        .await
        .unwrap();

    assert!(key.key.starts_with("sk_"));
    assert_eq!(key.webhook_url.as_deref(), Some(TEST_WEBHOOK_URL));

    let keys = keys_handle.lock().unwrap();
    assert_eq!(keys.len(), 1, "expected exactly one stored key");
    assert_eq!(keys[0], key);
}

#[tokio::test]
async fn should_register_key_without_webhook() {
    let uc = RegisterApiKeyUseCase {
        api_keys: MockApiKeyRepo::empty(),
    };

    let key = uc
        .execute(RegisterApiKeyInput { webhook_url: None })
        .await
        .unwrap();

    assert!(key.webhook_url.is_none());
}

#[tokio::test]
async fn should_treat_blank_webhook_as_absent() {
    let uc = RegisterApiKeyUseCase {
        api_keys: MockApiKeyRepo::empty(),
    };

    let key = uc
        .execute(RegisterApiKeyInput {
            webhook_url: Some("   ".to_owned()),
        })
        .await
        .unwrap();

    assert!(key.webhook_url.is_none());
}

#[tokio::test]
async fn should_reject_malformed_webhook() {
    let repo = MockApiKeyRepo::empty();
    let keys_handle = repo.keys_handle();
    let uc = RegisterApiKeyUseCase { api_keys: repo };

    let result = uc
        .execute(RegisterApiKeyInput {
            webhook_url: Some("hooks.example.com/h".to_owned()),
        })
        .await;

    assert!(
        matches!(result, Err(OtpServiceError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
    assert!(keys_handle.lock().unwrap().is_empty(), "nothing should be stored");
}

#[tokio::test]
async fn should_issue_distinct_keys() {
    let uc = RegisterApiKeyUseCase {
        api_keys: MockApiKeyRepo::empty(),
    };

    let a = uc.execute(RegisterApiKeyInput { webhook_url: None }).await.unwrap();
    let b = uc.execute(RegisterApiKeyInput { webhook_url: None }).await.unwrap();

    assert_ne!(a.key, b.key);
}
