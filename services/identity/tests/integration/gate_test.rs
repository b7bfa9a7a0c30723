use prestige_auth_types::headers::TokenHeaders;
use prestige_domain::account::{AccountType, ActivationStatus};
use prestige_testing::auth::{TestTokens, test_token_codec};

use prestige_identity::error::IdentityError;
use prestige_identity::handlers::guard::{ADMIN_SECURITY, CUSTOMER_SECURITY};
use prestige_identity::usecase::gate::AuthenticateUseCase;

use crate::helpers::{MockUserRepo, onboarded_user};

fn gate(users: MockUserRepo) -> AuthenticateUseCase<MockUserRepo> {
    AuthenticateUseCase {
        users,
        tokens: test_token_codec(),
    }
}

fn headers(access: Option<String>, refresh: Option<String>) -> TokenHeaders {
    TokenHeaders {
        access_token: access,
        refresh_token: refresh,
    }
}

#[tokio::test]
async fn should_resolve_principal_from_live_access_token() {
    let user = onboarded_user(AccountType::Admin, "admin@example.com");
    let tokens = TestTokens::new(user.id, AccountType::Admin);
    let users = MockUserRepo::new(vec![user.clone()]);

    let authenticated = gate(users)
        .execute_any(&headers(Some(tokens.access_token()), None), ADMIN_SECURITY)
        .await
        .unwrap();

    assert_eq!(authenticated.principal.user_id, user.id);
    assert_eq!(authenticated.principal.account_type, AccountType::Admin);
    assert!(authenticated.rotated_access_token.is_none());
}

#[tokio::test]
async fn should_rotate_expired_access_token_with_refresh_token() {
    let user = onboarded_user(AccountType::Customer, "c@example.com");
    let tokens = TestTokens::new(user.id, AccountType::Customer);
    let users = MockUserRepo::new(vec![user.clone()]);

    let authenticated = gate(users)
        .execute_any(
            &headers(Some(tokens.expired_access_token()), Some(tokens.refresh_token())),
            CUSTOMER_SECURITY,
        )
        .await
        .unwrap();

    let rotated = authenticated.rotated_access_token.unwrap();
    let claims = test_token_codec().verify(&rotated).unwrap();
    assert_eq!(claims.subject(), Some(user.id));
    assert!(!claims.refresh);
}

#[tokio::test]
async fn should_reject_expired_access_token_without_refresh_token() {
    let user = onboarded_user(AccountType::Customer, "c@example.com");
    let tokens = TestTokens::new(user.id, AccountType::Customer);
    let users = MockUserRepo::new(vec![user]);

    let result = gate(users)
        .execute_any(&headers(Some(tokens.expired_access_token()), None), CUSTOMER_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::WrongAuthentication)));
}

#[tokio::test]
async fn should_reject_missing_or_forged_tokens() {
    let users = MockUserRepo::default();

    let result = gate(users.clone())
        .execute_any(&headers(None, None), ADMIN_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::WrongAuthentication)));

    let result = gate(users)
        .execute_any(&headers(Some("not.a.jwt".into()), None), ADMIN_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::WrongAuthentication)));
}

#[tokio::test]
async fn should_reject_token_for_deleted_user() {
    let user = onboarded_user(AccountType::Admin, "admin@example.com");
    let tokens = TestTokens::new(user.id, AccountType::Admin);

    let result = gate(MockUserRepo::default())
        .execute_any(&headers(Some(tokens.access_token()), None), ADMIN_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::WrongAuthentication)));
}

#[tokio::test]
async fn should_deny_customer_token_on_admin_surface() {
    let user = onboarded_user(AccountType::Customer, "c@example.com");
    let tokens = TestTokens::new(user.id, AccountType::Customer);
    let users = MockUserRepo::new(vec![user]);

    let result = gate(users)
        .execute_any(&headers(Some(tokens.access_token()), None), ADMIN_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::AccessDenied)));
}

#[tokio::test]
async fn should_block_suspended_and_banned_principals() {
    let mut suspended = onboarded_user(AccountType::Admin, "s@example.com");
    suspended.activation_status = ActivationStatus::Suspended;
    let mut banned = onboarded_user(AccountType::Admin, "b@example.com");
    banned.activation_status = ActivationStatus::Banned;
    let suspended_tokens = TestTokens::new(suspended.id, AccountType::Admin);
    let banned_tokens = TestTokens::new(banned.id, AccountType::Admin);
    let users = MockUserRepo::new(vec![suspended, banned]);

    let result = gate(users.clone())
        .execute_any(
            &headers(Some(suspended_tokens.access_token()), None),
            ADMIN_SECURITY,
        )
        .await;
    assert!(matches!(result, Err(IdentityError::SuspendedUser)));

    let result = gate(users)
        .execute_any(&headers(Some(banned_tokens.access_token()), None), ADMIN_SECURITY)
        .await;
    assert!(matches!(result, Err(IdentityError::BannedUser)));
}
