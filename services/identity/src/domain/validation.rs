//! Boundary validation shared by request bodies, query strings and path ids.

use uuid::Uuid;

use crate::error::IdentityError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Implemented by request bodies; run by the `Valid` extractor after parsing.
pub trait Validate {
    fn validate(&self) -> Result<(), IdentityError>;
}

/// Email addresses are stored and matched lowercased.
pub fn normalize_email(address: &str) -> String {
    address.trim().to_lowercase()
}

pub fn required(value: &str) -> Result<(), IdentityError> {
    if value.trim().is_empty() {
        return Err(IdentityError::RequiredFields);
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace and non-empty domain labels.
pub fn email(address: &str) -> Result<(), IdentityError> {
    required(address)?;
    let address = address.trim();
    let Some((local, domain)) = address.split_once('@') else {
        return Err(IdentityError::InvalidEmailFormat);
    };
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && !address.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if !well_formed {
        return Err(IdentityError::InvalidEmailFormat);
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), IdentityError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::PasswordLength);
    }
    Ok(())
}

/// Three uppercase ASCII letters.
pub fn iso3(code: &str) -> Result<(), IdentityError> {
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(IdentityError::InvalidCountry);
    }
    Ok(())
}

pub fn object_id(raw: &str) -> Result<Uuid, IdentityError> {
    raw.trim()
        .parse()
        .map_err(|_| IdentityError::InvalidObjectId)
}

/// Trim, and treat blank strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
