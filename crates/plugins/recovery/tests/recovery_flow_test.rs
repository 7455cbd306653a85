//! End-to-end tests for the recovery workflow over the in-memory store.

use std::sync::Arc;

use harvest_auth_adapter_memory::MemoryStore;
use harvest_auth_core::error::RecoveryError;
use harvest_auth_core::traits::RecoveryStore;
use harvest_auth_core::types::{Role, User};
use harvest_auth_mailer::MemoryMailer;
use harvest_auth_plugin_recovery::{RecoveryConfig, RecoveryService, TokenRedemption};

const USER_ID: i64 = 1;

fn test_config() -> RecoveryConfig {
    // MIN_COST keeps the hashing step fast in tests.
    RecoveryConfig::default().bcrypt_cost(4)
}

async fn setup_with(config: RecoveryConfig) -> (Arc<MemoryStore>, Arc<MemoryMailer>, RecoveryService) {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(MemoryMailer::new());
    store
        .seed_user(User::new(
            USER_ID,
            "alice",
            "alice@example.com",
            bcrypt::hash("OldSecret1", 4).unwrap(),
            Role::Farmer,
        ))
        .await;

    let service = RecoveryService::new(store.clone(), mailer.clone(), config);
    (store, mailer, service)
}

async fn setup() -> (Arc<MemoryStore>, Arc<MemoryMailer>, RecoveryService) {
    setup_with(test_config()).await
}

async fn issued_code(store: &MemoryStore) -> String {
    store
        .latest_credential(USER_ID)
        .await
        .unwrap()
        .expect("a code should be issued")
        .code
}

fn redemption(token: &str, password: &str) -> TokenRedemption {
    TokenRedemption {
        token: token.to_string(),
        new_password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

#[tokio::test]
async fn full_reset_flow_changes_password_once() {
    let (store, mailer, service) = setup().await;

    let receipt = service.request_code("alice@example.com", "alice").await.unwrap();
    assert!(receipt.accepted);
    assert!(receipt.delivery_confirmed);

    let code = issued_code(&store).await;
    assert_eq!(code.len(), 6);
    assert!(mailer.last().await.unwrap().text_body.contains(&code));

    let issued = service.verify_code(USER_ID, &code).await.unwrap();
    assert_eq!(issued.reset_token.len(), 32);

    service
        .redeem_token(redemption(&issued.reset_token, "NewSecret1"))
        .await
        .unwrap();

    let hash = store.password_hash(USER_ID).await.unwrap();
    assert!(bcrypt::verify("NewSecret1", &hash).unwrap());
    assert!(!bcrypt::verify("OldSecret1", &hash).unwrap());

    // The token is single-use.
    let err = service
        .redeem_token(redemption(&issued.reset_token, "AnotherSecret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecoveryError::TokenAlreadyUsed));
    assert!(bcrypt::verify("NewSecret1", &hash).unwrap());
}

#[tokio::test]
async fn unknown_account_gets_success_shaped_receipt() {
    let (store, mailer, service) = setup().await;

    let receipt = service.request_code("nobody@example.com", "nobody").await.unwrap();
    assert!(receipt.accepted);
    assert!(receipt.delivery_confirmed);

    // Nothing stored, nothing sent.
    assert_eq!(store.credential_count().await, 0);
    assert!(mailer.sent().await.is_empty());
}

#[tokio::test]
async fn wrong_code_is_a_mismatch() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();

    let code = issued_code(&store).await;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = service.verify_code(USER_ID, wrong).await.unwrap_err();
    assert!(matches!(err, RecoveryError::CodeMismatch));
}

#[tokio::test]
async fn code_verifies_at_most_once() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;

    service.verify_code(USER_ID, &code).await.unwrap();

    let err = service.verify_code(USER_ID, &code).await.unwrap_err();
    assert!(matches!(err, RecoveryError::AlreadyUsed));
}

#[tokio::test]
async fn verify_accepts_messy_but_matching_input() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;

    let messy = format!(" {} {} ", &code[..3], &code[3..]);
    assert!(service.verify_code(USER_ID, &messy).await.is_ok());
}

#[tokio::test]
async fn verify_without_any_code_reports_none_issued() {
    let (_store, _mailer, service) = setup().await;

    let err = service.verify_code(USER_ID, "123456").await.unwrap_err();
    assert!(matches!(err, RecoveryError::NoCodeIssued));
}

#[tokio::test]
async fn malformed_submission_fails_before_lookup() {
    let (_store, _mailer, service) = setup().await;

    let err = service.verify_code(USER_ID, "no digits here").await.unwrap_err();
    assert!(matches!(err, RecoveryError::MalformedCode));

    let err = service.verify_code(USER_ID, "1234567").await.unwrap_err();
    assert!(matches!(err, RecoveryError::MalformedCode));
}

#[tokio::test]
async fn new_issuance_supersedes_outstanding_code() {
    let (store, _mailer, service) = setup().await;

    service.request_code("alice@example.com", "alice").await.unwrap();
    let first = issued_code(&store).await;

    service.resend_code("alice@example.com", "alice").await.unwrap();
    let second = issued_code(&store).await;

    if first == second {
        // One-in-a-million collision; the superseded-code check below
        // would be vacuous.
        return;
    }

    let err = service.verify_code(USER_ID, &first).await.unwrap_err();
    assert!(matches!(err, RecoveryError::CodeMismatch));

    assert!(service.verify_code(USER_ID, &second).await.is_ok());
}

#[tokio::test]
async fn expired_code_is_rejected_even_if_unused() {
    let (store, _mailer, service) = setup_with(test_config().code_ttl_secs(-1)).await;

    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;

    let err = service.verify_code(USER_ID, &code).await.unwrap_err();
    assert!(matches!(err, RecoveryError::Expired));
}

#[tokio::test]
async fn replayed_code_reports_used_not_expired() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;
    service.verify_code(USER_ID, &code).await.unwrap();

    // Force the consumed credential past its expiry; the replay must still
    // report the more actionable state.
    let mut credential = store.latest_credential(USER_ID).await.unwrap().unwrap();
    credential.expires_at = chrono::Utc::now() - chrono::Duration::minutes(1);
    credential.consumed = true;
    store.replace_credential(&credential).await.unwrap();

    let err = service.verify_code(USER_ID, &code).await.unwrap_err();
    assert!(matches!(err, RecoveryError::AlreadyUsed));
}

#[tokio::test]
async fn mail_failure_does_not_roll_back_issuance() {
    let (store, mailer, service) = setup().await;
    mailer.set_failing(true).await;

    let receipt = service.request_code("alice@example.com", "alice").await.unwrap();
    assert!(receipt.accepted);
    assert!(!receipt.delivery_confirmed);

    // The code is issued regardless; a resend can still deliver it.
    assert_eq!(store.credential_count().await, 1);

    mailer.set_failing(false).await;
    let receipt = service.resend_code("alice@example.com", "alice").await.unwrap();
    assert!(receipt.delivery_confirmed);
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
    let (store, _mailer, service) = setup_with(test_config().token_ttl_secs(-1)).await;

    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;
    let issued = service.verify_code(USER_ID, &code).await.unwrap();

    let err = service
        .redeem_token(redemption(&issued.reset_token, "NewSecret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecoveryError::TokenExpired));
}

#[tokio::test]
async fn mismatched_confirmation_rejected_before_store_access() {
    let (store, _mailer, service) = setup().await;

    let err = service
        .redeem_token(TokenRedemption {
            token: "f".repeat(32),
            new_password: "NewSecret1".to_string(),
            confirm_password: "Different1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RecoveryError::PasswordMismatch));

    // Nothing was looked up or consumed.
    assert_eq!(store.reset_token_count().await, 0);
}

#[tokio::test]
async fn weak_password_rejected_without_consuming_token() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;
    let issued = service.verify_code(USER_ID, &code).await.unwrap();

    let err = service
        .redeem_token(redemption(&issued.reset_token, "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecoveryError::WeakPassword { .. }));

    // The token survives the rejected attempt.
    assert!(service
        .redeem_token(redemption(&issued.reset_token, "NewSecret1"))
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_token_is_invalid() {
    let (_store, _mailer, service) = setup().await;

    let err = service
        .redeem_token(redemption(&"0".repeat(32), "NewSecret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RecoveryError::InvalidToken));
}

#[tokio::test]
async fn racing_verifications_succeed_exactly_once() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;

    let service = Arc::new(service);
    let a = tokio::spawn({
        let service = Arc::clone(&service);
        let code = code.clone();
        async move { service.verify_code(USER_ID, &code).await }
    });
    let b = tokio::spawn({
        let service = Arc::clone(&service);
        let code = code.clone();
        async move { service.verify_code(USER_ID, &code).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RecoveryError::AlreadyUsed))));
}

#[tokio::test]
async fn racing_redemptions_succeed_exactly_once() {
    let (store, _mailer, service) = setup().await;
    service.request_code("alice@example.com", "alice").await.unwrap();
    let code = issued_code(&store).await;
    let issued = service.verify_code(USER_ID, &code).await.unwrap();

    let service = Arc::new(service);
    let token = issued.reset_token;
    let a = tokio::spawn({
        let service = Arc::clone(&service);
        let token = token.clone();
        async move { service.redeem_token(redemption(&token, "NewSecret1")).await }
    });
    let b = tokio::spawn({
        let service = Arc::clone(&service);
        let token = token.clone();
        async move { service.redeem_token(redemption(&token, "OtherSecret1")).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RecoveryError::TokenAlreadyUsed))));

    // Whichever writer won, the stored hash matches its password.
    let hash = store.password_hash(USER_ID).await.unwrap();
    assert!(
        bcrypt::verify("NewSecret1", &hash).unwrap()
            || bcrypt::verify("OtherSecret1", &hash).unwrap()
    );
}
