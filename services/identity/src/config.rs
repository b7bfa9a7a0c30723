use chrono::Duration;
use serde::Deserialize;

use prestige_auth_types::secret::{SecretCodec, SecretError};
use prestige_auth_types::token::TokenCodec;
use prestige_core::config::Config;

use crate::domain::types::{AccountSettings, MailTemplates};
use crate::infra::mailer::Sender;

/// Identity service configuration loaded from environment variables.
///
/// Not `Debug`: it carries the signing and encryption secrets.
#[derive(Deserialize)]
pub struct IdentityConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8080). Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret for access and refresh tokens.
    pub jwt_secret_key: String,
    /// Seconds (default 14400).
    #[serde(default = "default_access_ttl")]
    pub jwt_access_token_expires_in: u64,
    /// Seconds (default 604800).
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_token_expires_in: u64,

    /// 64 hex characters, the AES-256 key for verification and reset tokens.
    pub aes_secret_key: String,
    /// Seconds (default 86400).
    #[serde(default = "default_secret_ttl")]
    pub verification_token_expiration: i64,
    /// Seconds (default 86400).
    #[serde(default = "default_secret_ttl")]
    pub password_reset_token_expiration: i64,

    #[serde(default)]
    pub admin_portal_url: String,
    #[serde(default)]
    pub customer_portal_url: String,

    #[serde(default = "default_brevo_api_url")]
    pub brevo_api_url: String,
    #[serde(default)]
    pub brevo_api_key: String,
    #[serde(default)]
    pub brevo_sender_name: String,
    #[serde(default)]
    pub brevo_sender_email: String,
    #[serde(default)]
    pub brevo_access_admin_portal_tid: i64,
    #[serde(default)]
    pub brevo_reset_password_tid: i64,
    #[serde(default)]
    pub brevo_verify_account_tid: i64,
}

fn default_port() -> u16 {
    8080
}

fn default_access_ttl() -> u64 {
    14400
}

fn default_refresh_ttl() -> u64 {
    604800
}

fn default_secret_ttl() -> i64 {
    86400
}

fn default_brevo_api_url() -> String {
    "https://api.brevo.com/v3/smtp/email".to_owned()
}

impl Config for IdentityConfig {}

impl IdentityConfig {
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(
            &self.jwt_secret_key,
            self.jwt_access_token_expires_in,
            self.jwt_refresh_token_expires_in,
        )
    }

    pub fn secret_codec(&self) -> Result<SecretCodec, SecretError> {
        SecretCodec::from_hex(&self.aes_secret_key)
    }

    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            verification_ttl: Duration::seconds(self.verification_token_expiration),
            password_reset_ttl: Duration::seconds(self.password_reset_token_expiration),
            admin_portal_url: self.admin_portal_url.clone(),
            customer_portal_url: self.customer_portal_url.clone(),
            templates: MailTemplates {
                verify_account: self.brevo_verify_account_tid,
                reset_password: self.brevo_reset_password_tid,
                access_admin_portal: self.brevo_access_admin_portal_tid,
            },
        }
    }

    pub fn mail_sender(&self) -> Sender {
        Sender {
            name: self.brevo_sender_name.clone(),
            email: self.brevo_sender_email.clone(),
        }
    }
}
