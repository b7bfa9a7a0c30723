use std::sync::Arc;

use anyhow::Context as _;
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use prestige_auth_types::secret::{SecretCodec, SecretPayload};
use prestige_auth_types::token::{TokenCodec, TokenPair};
use prestige_domain::account::{AccountType, ActivationStatus};

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{
    AccountSettings, Profile, SecretToken, User, reset_expired, reset_token_valid,
    verification_expired,
};
use crate::domain::validation::normalize_email;
use crate::error::IdentityError;
use crate::infra::password::{spawn_hash, spawn_verify};
use crate::usecase::gate::ensure_not_blocked;
use crate::usecase::mail;

/// Encrypt a fresh `{userId, token}` record and stamp it with `now + ttl`.
pub fn mint_secret(
    secrets: &SecretCodec,
    user_id: Uuid,
    ttl: Duration,
) -> Result<SecretToken, IdentityError> {
    let value = secrets
        .encrypt(&SecretPayload::fresh(user_id))
        .context("failed to encrypt secret token")?;
    Ok(SecretToken::new(value, ttl))
}

/// Tokens handed out on sign-in and first password creation.
#[derive(Debug)]
pub struct SessionOutput {
    pub account_type: AccountType,
    pub tokens: TokenPair,
}

fn issue_session(tokens: &TokenCodec, user: &User) -> Result<SessionOutput, IdentityError> {
    let pair = tokens
        .issue_pair(user.id, user.account_type)
        .context("failed to sign tokens")?;
    Ok(SessionOutput {
        account_type: user.account_type,
        tokens: pair,
    })
}

/// Reject when the email or phone is already registered within `account_type`.
/// `None` skips that check.
pub async fn ensure_contact_available<U: UserRepository>(
    users: &U,
    account_type: AccountType,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), IdentityError> {
    if let Some(email) = email {
        if users.find_by_email(account_type, email).await?.is_some() {
            return Err(IdentityError::EmailAlreadyExists);
        }
    }
    if let Some(phone) = phone {
        if users.find_by_phone(account_type, phone).await?.is_some() {
            return Err(IdentityError::PhoneAlreadyExists);
        }
    }
    Ok(())
}

// ── SignUp ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: Uuid,
    pub email_sent: bool,
}

/// Customer self-registration. Creates the account unverified and passwordless.
pub struct SignUpUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<U: UserRepository, M: Mailer> SignUpUseCase<U, M> {
    pub async fn execute(&self, mut profile: Profile) -> Result<SignUpOutput, IdentityError> {
        profile.email_address = normalize_email(&profile.email_address);
        ensure_contact_available(
            &self.users,
            AccountType::Customer,
            Some(&profile.email_address),
            Some(&profile.phone_number),
        )
        .await?;

        let mut user = User::new(AccountType::Customer, profile);
        let verification = mint_secret(&self.secrets, user.id, self.settings.verification_ttl)?;
        user.email.verification = Some(verification.clone());
        self.users.create(&user).await?;

        info!(user_id = %user.id, account_type = %user.account_type, "account created");

        let email_sent = self
            .mailer
            .send(mail::verify_account(&self.settings, &user, &verification.value))
            .await;

        Ok(SignUpOutput {
            user_id: user.id,
            email_sent,
        })
    }
}

// ── VerifyAccount ────────────────────────────────────────────────────────────

/// Marks the email verified and hands back a password-reset token so the client
/// can chain straight into password creation.
pub struct VerifyAccountUseCase<U: UserRepository> {
    pub users: U,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<U: UserRepository> VerifyAccountUseCase<U> {
    /// Returns the password-reset token.
    pub async fn execute(&self, token: &str) -> Result<String, IdentityError> {
        let payload: SecretPayload = self
            .secrets
            .decrypt(token)
            .ok_or(IdentityError::InvalidVerificationToken)?;

        let mut user = self
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(IdentityError::InvalidVerificationToken)?;

        if user.is_fully_onboarded() {
            return Err(IdentityError::AccountAlreadyVerified);
        }

        // The verification token stays stored until a password is set.
        let verification = user
            .email
            .verification
            .clone()
            .filter(|stored| stored.matches(token))
            .ok_or(IdentityError::InvalidVerificationToken)?;
        let window_closed = verification_expired(verification.expires_at, Utc::now());

        if user.email.verified {
            // Interrupted onboarding: resume with the outstanding reset token.
            if window_closed {
                return Err(IdentityError::PasswordNotYetCreated);
            }
            if let Some(reset) = &user.email.password_reset {
                return Ok(reset.value.clone());
            }
        } else {
            if window_closed {
                return Err(IdentityError::VerificationTokenExpired);
            }
            user.email.verified = true;
        }

        let reset = mint_secret(&self.secrets, user.id, self.settings.password_reset_ttl)?;
        user.email.password_reset = Some(reset.clone());
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, account_type = %user.account_type, "email verified");
        Ok(reset.value)
    }
}

// ── ResendVerificationToken ──────────────────────────────────────────────────

pub struct ResendVerificationTokenUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<U: UserRepository, M: Mailer> ResendVerificationTokenUseCase<U, M> {
    /// Returns whether the email went out.
    pub async fn execute(&self, email: &str) -> Result<bool, IdentityError> {
        let mut user = self
            .users
            .find_by_email(AccountType::Customer, &normalize_email(email))
            .await?
            .ok_or(IdentityError::EmailNotFound)?;

        if user.is_fully_onboarded() {
            return Err(IdentityError::AccountAlreadyVerified);
        }

        let verification = mint_secret(&self.secrets, user.id, self.settings.verification_ttl)?;
        user.email.verification = Some(verification.clone());
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, "verification token reissued");

        Ok(self
            .mailer
            .send(mail::verify_account(&self.settings, &user, &verification.value))
            .await)
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

/// First-time password creation from a reset token. Signs the account in.
pub struct SetPasswordUseCase<U: UserRepository> {
    pub users: U,
    pub secrets: SecretCodec,
    pub tokens: TokenCodec,
}

impl<U: UserRepository> SetPasswordUseCase<U> {
    pub async fn execute(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<SessionOutput, IdentityError> {
        let payload: SecretPayload = self
            .secrets
            .decrypt(token)
            .ok_or(IdentityError::InvalidPasswordResetToken)?;

        let mut user = self
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(IdentityError::InvalidPasswordResetToken)?;

        if user.has_password() {
            return Err(IdentityError::PasswordAlreadyCreated);
        }
        let reset = user
            .email
            .password_reset
            .as_ref()
            .filter(|stored| stored.matches(token))
            .ok_or(IdentityError::InvalidPasswordResetToken)?;
        if reset_expired(reset.expires_at, Utc::now()) {
            return Err(IdentityError::PasswordResetTokenExpired);
        }

        user.password_hash = Some(spawn_hash(new_password).await?);
        // The token was delivered to this mailbox, which proves ownership.
        user.email.verified = true;
        user.email.verification = None;
        user.email.password_reset = None;
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, account_type = %user.account_type, "password created");
        issue_session(&self.tokens, &user)
    }
}

// ── SendPasswordResetToken ───────────────────────────────────────────────────

pub struct SendPasswordResetTokenUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<U: UserRepository, M: Mailer> SendPasswordResetTokenUseCase<U, M> {
    /// Returns whether the email went out.
    pub async fn execute(
        &self,
        account_type: AccountType,
        email: &str,
    ) -> Result<bool, IdentityError> {
        let mut user = self
            .users
            .find_by_email(account_type, &normalize_email(email))
            .await?
            .ok_or(IdentityError::EmailNotFound)?;

        // Still inside the sign-up verification window: the account has to be
        // verified first.
        let verification_pending = user
            .email
            .verification
            .as_ref()
            .is_some_and(|v| !verification_expired(v.expires_at, Utc::now()));
        if !user.email.verified && !user.has_password() && verification_pending {
            return Err(IdentityError::AccountNotYetVerified);
        }
        ensure_not_blocked(user.activation_status)?;

        let reset = mint_secret(&self.secrets, user.id, self.settings.password_reset_ttl)?;
        user.email.password_reset = Some(reset.clone());
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, account_type = %account_type, "password reset token issued");

        Ok(self
            .mailer
            .send(mail::reset_password(&self.settings, &user, &reset.value))
            .await)
    }
}

// ── CheckPasswordResetToken ──────────────────────────────────────────────────

pub struct CheckPasswordResetTokenUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CheckPasswordResetTokenUseCase<U> {
    /// `true` only for a stored, unexpired token. Unknown tokens are simply `false`.
    pub async fn execute(&self, token: &str) -> Result<bool, IdentityError> {
        let Some(user) = self.users.find_by_reset_token(token).await? else {
            return Ok(false);
        };
        let now = Utc::now();
        Ok(user
            .email
            .password_reset
            .as_ref()
            .is_some_and(|reset| reset.matches(token) && reset_token_valid(reset.expires_at, now)))
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

/// Replaces an existing password.
pub struct ResetPasswordUseCase<U: UserRepository> {
    pub users: U,
    pub secrets: SecretCodec,
}

impl<U: UserRepository> ResetPasswordUseCase<U> {
    pub async fn execute(&self, token: &str, new_password: &str) -> Result<(), IdentityError> {
        let payload: SecretPayload = self
            .secrets
            .decrypt(token)
            .ok_or(IdentityError::InvalidPasswordResetToken)?;

        let mut user = self
            .users
            .find_by_id(payload.user_id)
            .await?
            .ok_or(IdentityError::InvalidPasswordResetToken)?;

        ensure_not_blocked(user.activation_status)?;
        let reset = user
            .email
            .password_reset
            .as_ref()
            .filter(|stored| stored.matches(token))
            .ok_or(IdentityError::InvalidPasswordResetToken)?;
        if reset_expired(reset.expires_at, Utc::now()) {
            return Err(IdentityError::PasswordResetTokenExpired);
        }

        user.password_hash = Some(spawn_hash(new_password).await?);
        user.email.verification = None;
        user.email.password_reset = None;
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, account_type = %user.account_type, "password reset");
        Ok(())
    }
}

// ── SignIn ───────────────────────────────────────────────────────────────────

pub struct SignInUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenCodec,
}

impl<U: UserRepository> SignInUseCase<U> {
    pub async fn execute(
        &self,
        account_type: AccountType,
        email: &str,
        password: &str,
    ) -> Result<SessionOutput, IdentityError> {
        let mut user = self
            .users
            .find_by_email(account_type, &normalize_email(email))
            .await?
            .ok_or(IdentityError::WrongCredentials)?;

        // Passwordless accounts fall through to the onboarding errors below.
        let password_matches = match user.password_hash.clone() {
            Some(hash) => spawn_verify(password, hash).await?,
            None => true,
        };
        if !password_matches {
            return Err(IdentityError::WrongCredentials);
        }
        if !user.email.verified {
            return Err(IdentityError::AccountNotYetVerified);
        }
        if !user.has_password() {
            return Err(IdentityError::PasswordNotYetCreated);
        }
        ensure_not_blocked(user.activation_status)?;

        if user.activation_status == ActivationStatus::Inactive {
            user.activation_status = ActivationStatus::Active;
            user.touch();
            self.users.save(&user).await?;
            info!(user_id = %user.id, account_type = %account_type, "account activated");
        }

        issue_session(&self.tokens, &user)
    }
}
