//! Transactional email payloads.

use chrono::{Datelike, Utc};
use serde_json::json;

use prestige_domain::account::AccountType;

use crate::domain::types::{AccountSettings, MailMessage, User};

pub fn verify_account(settings: &AccountSettings, user: &User, token: &str) -> MailMessage {
    MailMessage {
        template_id: settings.templates.verify_account,
        to: user.email.address.clone(),
        subject: "Confirm your email!".into(),
        params: json!({
            "email": user.email.address,
            "fullName": format!("{} {}", user.personal.first_name, user.personal.last_name),
            "link": format!("{}/confirm?token={token}", settings.portal_url(AccountType::Customer)),
        }),
    }
}

pub fn reset_password(settings: &AccountSettings, user: &User, token: &str) -> MailMessage {
    MailMessage {
        template_id: settings.templates.reset_password,
        to: user.email.address.clone(),
        subject: "Reset your password".into(),
        params: json!({
            "firstName": user.personal.first_name,
            "link": format!("{}/reset-password?token={token}", settings.portal_url(user.account_type)),
            "year": Utc::now().year(),
        }),
    }
}

pub fn access_admin_portal(settings: &AccountSettings, user: &User, token: &str) -> MailMessage {
    MailMessage {
        template_id: settings.templates.access_admin_portal,
        to: user.email.address.clone(),
        subject: "Welcome to the admin portal!".into(),
        params: json!({
            "firstName": user.personal.first_name,
            "link": format!("{}/reset-password?token={token}", settings.portal_url(AccountType::Admin)),
            "year": Utc::now().year(),
        }),
    }
}
