use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prestige_domain::access::AccessControl;
use prestige_domain::account::{AccountType, ActivationStatus};

// ── Secret tokens ────────────────────────────────────────────────────────────

/// Stored copy of an outstanding verification or password-reset token.
///
/// There is at most one per purpose per user; issuing a new one overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl SecretToken {
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn matches(&self, presented: &str) -> bool {
        self.value == presented
    }
}

/// Verification windows close when the expiry is reached: `expires <= now` is expired.
pub fn verification_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}

/// Reset tokens are still usable at the exact expiry instant: only `expires < now` is expired.
pub fn reset_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

/// Read-only reset token probe: valid only while `expires > now`.
pub fn reset_token_valid(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at > now
}

// ── User ─────────────────────────────────────────────────────────────────────

/// Email change awaiting OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEmail {
    pub address: String,
    pub otp_code: String,
    pub otp_expires_at: DateTime<Utc>,
    #[serde(default)]
    pub otp_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailState {
    pub address: String,
    pub verified: bool,
    pub verification: Option<SecretToken>,
    pub password_reset: Option<SecretToken>,
    pub pending: Option<PendingEmail>,
}

impl EmailState {
    pub fn unverified(address: String) -> Self {
        Self {
            address,
            verified: false,
            verification: None,
            password_reset: None,
            pending: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneState {
    pub number: String,
    pub verified: bool,
    pub otp: Option<PhoneOtp>,
}

impl PhoneState {
    pub fn unverified(number: String) -> Self {
        Self {
            number,
            verified: false,
            otp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Link to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Personal {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub avatar: Option<Resource>,
    pub cover: Option<Resource>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// ISO3 country code.
    pub citizenship: Option<String>,
}

impl Personal {
    /// `first [middle] last`, the form used for search and sorting.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// ISO3 country code.
    pub country_code: String,
    pub state_id: Option<String>,
    pub city_id: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

/// Account aggregate. Mutated in memory by the use cases and written back whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub account_type: AccountType,
    pub role_id: Option<Uuid>,
    pub email: EmailState,
    pub phone: PhoneState,
    pub password_hash: Option<String>,
    pub personal: Personal,
    pub address: Option<Address>,
    pub activation_status: ActivationStatus,
    /// Snapshot copied from the role at creation; never live-joined.
    pub access_control: Option<AccessControl>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(account_type: AccountType, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            account_type,
            role_id: None,
            email: EmailState::unverified(profile.email_address),
            phone: PhoneState::unverified(profile.phone_number),
            password_hash: None,
            personal: profile.personal,
            address: Some(profile.address),
            activation_status: ActivationStatus::Inactive,
            access_control: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Email verified and a password established: onboarding is complete.
    pub fn is_fully_onboarded(&self) -> bool {
        self.email.verified && self.has_password()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Mutable business data supplied on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email_address: String,
    pub phone_number: String,
    pub personal: Personal,
    pub address: Address,
}

/// Search criteria for the admin user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub account_type: Option<AccountType>,
    pub role_id: Option<Uuid>,
    pub activation_status: Option<ActivationStatus>,
    /// Case-insensitive substring of full name, email address or phone number.
    pub q: Option<String>,
}

// ── Roles and permissions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub access_control: AccessControl,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: String,
    pub description: Option<String>,
    pub access_control: AccessControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Transactional email template ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailTemplates {
    pub verify_account: i64,
    pub reset_password: i64,
    pub access_admin_portal: i64,
}

/// Lifetimes and links used by the account lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    pub verification_ttl: Duration,
    pub password_reset_ttl: Duration,
    pub admin_portal_url: String,
    pub customer_portal_url: String,
    pub templates: MailTemplates,
}

impl AccountSettings {
    pub fn portal_url(&self, account_type: AccountType) -> &str {
        match account_type {
            AccountType::Admin => self.admin_portal_url.trim_end_matches('/'),
            AccountType::Customer => self.customer_portal_url.trim_end_matches('/'),
        }
    }
}

/// One outbound transactional email.
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub template_id: i64,
    pub to: String,
    pub subject: String,
    pub params: serde_json::Value,
}
