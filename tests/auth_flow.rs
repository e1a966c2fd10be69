//! Registration, login, token refresh and the password lifecycle.

mod common;

use oxcart::models::user::{ForgotPasswordPayload, LoginPayload, RegisterPayload};
use oxcart::ApiError;

fn login_payload(email: &str, password: &str) -> LoginPayload {
    LoginPayload { email: email.to_string(), password: password.to_string() }
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let state = common::state();
    common::register(&state, "a@x.com").await;

    let err = state
        .users
        .register(RegisterPayload {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@x.com".to_string(),
            mobile: "1111111111".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn login_issues_verifiable_tokens() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;

    let session = state.users.login(login_payload("a@x.com", "password1"), false).await.unwrap();
    assert_eq!(session.response.email, "a@x.com");
    assert_eq!(Some(state.credentials.verify_token(&session.response.token).unwrap()), user.id);
    assert_eq!(Some(state.credentials.verify_token(&session.refresh_token).unwrap()), user.id);

    let err = state.users.login(login_payload("a@x.com", "wrong-pass"), false).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn admin_login_rejects_plain_users() {
    let state = common::state();
    common::register(&state, "a@x.com").await;

    let err = state.users.login(login_payload("a@x.com", "password1"), true).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn refresh_trades_cookie_for_access_token() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let session = state.users.login(login_payload("a@x.com", "password1"), false).await.unwrap();

    let access = state.users.refresh_access_token(&session.refresh_token).await.unwrap();
    assert_eq!(Some(state.credentials.verify_token(&access).unwrap()), user.id);

    // a token nobody stored is refused, even if it would verify
    let foreign = state.credentials.issue_refresh_token(user.id.unwrap()).unwrap();
    if foreign != session.refresh_token {
        let err = state.users.refresh_access_token(&foreign).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn logout_is_idempotent() {
    let state = common::state();
    common::register(&state, "a@x.com").await;
    let session = state.users.login(login_payload("a@x.com", "password1"), false).await.unwrap();

    state.users.logout(&session.refresh_token).await.unwrap();
    // the stored token is gone, so refresh now fails
    let err = state.users.refresh_access_token(&session.refresh_token).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    // and logging out again (or with a token nobody holds) still succeeds
    state.users.logout(&session.refresh_token).await.unwrap();
    state.users.logout("never-issued").await.unwrap();
}

#[tokio::test]
async fn reset_token_flow_replaces_password() {
    let state = common::state();
    common::register(&state, "a@x.com").await;

    let token = state
        .users
        .forgot_password_token(ForgotPasswordPayload { email: "a@x.com".to_string() })
        .await
        .unwrap();
    state.users.reset_password(&token, "fresh-pass").await.unwrap();

    assert!(state.users.login(login_payload("a@x.com", "password1"), false).await.is_err());
    state.users.login(login_payload("a@x.com", "fresh-pass"), false).await.unwrap();

    // a reset token is single use: the digest was cleared
    let err = state.users.reset_password(&token, "again").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn unknown_reset_token_is_rejected() {
    let state = common::state();
    common::register(&state, "a@x.com").await;

    let err = state.users.reset_password("deadbeef", "whatever1").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}
