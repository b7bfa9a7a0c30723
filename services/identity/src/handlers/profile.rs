//! Profile request body and the user views shared by `users` and `me`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use prestige_domain::access::AccessControl;
use prestige_domain::account::{AccountType, ActivationStatus};

use crate::domain::directory::{CountryInfo, Location, NamedRef};
use crate::domain::types::{Address, Gender, Personal, Profile, Resource};
use crate::domain::validation::{self, Validate, non_blank};
use crate::error::IdentityError;
use crate::usecase::user::{RoleRef, UserDetails, UserSummary};

// ── Request ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub avatar: Option<Resource>,
    pub cover: Option<Resource>,
    pub email_address: String,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub citizenship: Option<String>,
    pub country_code: String,
    #[serde(default, deserialize_with = "flexible_id")]
    pub state_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub city_id: Option<String>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

/// State and city ids arrive as numbers from some clients and strings from others.
fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(non_blank(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    })))
}

impl Validate for ProfileRequest {
    fn validate(&self) -> Result<(), IdentityError> {
        validation::required(&self.first_name)?;
        validation::required(&self.last_name)?;
        validation::email(&self.email_address)?;
        validation::required(&self.phone_number)?;
        validation::required(&self.country_code)?;
        validation::iso3(self.country_code.trim())?;
        if let Some(citizenship) = self.citizenship.as_deref().filter(|c| !c.trim().is_empty()) {
            validation::iso3(citizenship.trim())?;
        }
        Ok(())
    }
}

impl ProfileRequest {
    pub fn into_profile(self) -> Profile {
        Profile {
            email_address: self.email_address.trim().to_owned(),
            phone_number: self.phone_number.trim().to_owned(),
            personal: Personal {
                first_name: self.first_name.trim().to_owned(),
                middle_name: non_blank(self.middle_name),
                last_name: self.last_name.trim().to_owned(),
                avatar: self.avatar,
                cover: self.cover,
                date_of_birth: self.date_of_birth,
                gender: self.gender,
                citizenship: non_blank(self.citizenship),
            },
            address: Address {
                country_code: self.country_code.trim().to_owned(),
                state_id: self.state_id,
                city_id: self.city_id,
                address_line: non_blank(self.address_line),
                postal_code: non_blank(self.postal_code),
            },
        }
    }
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RoleRefResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<RoleRef> for RoleRefResponse {
    fn from(role: RoleRef) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}

/// List row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub account_type: AccountType,
    pub role: Option<RoleRefResponse>,
    pub full_name: String,
    pub avatar: Option<Resource>,
    pub email_address: String,
    pub phone_number: String,
    pub country: Option<CountryInfo>,
    pub state: Option<NamedRef>,
    pub city: Option<NamedRef>,
    pub activation_status: ActivationStatus,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        let UserSummary {
            user,
            role,
            location,
        } = summary;
        Self {
            id: user.id,
            account_type: user.account_type,
            role: role.map(Into::into),
            full_name: user.personal.full_name(),
            avatar: user.personal.avatar,
            email_address: user.email.address,
            phone_number: user.phone.number,
            country: location.country,
            state: location.state,
            city: location.city,
            activation_status: user.activation_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    pub address: String,
    pub is_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneResponse {
    pub number: String,
    pub is_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalResponse {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub avatar: Option<Resource>,
    pub cover: Option<Resource>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub citizenship: Option<CountryInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub country: Option<CountryInfo>,
    pub state: Option<NamedRef>,
    pub city: Option<NamedRef>,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressResponse {
    fn new(location: Location, address: Option<Address>) -> Self {
        let (address_line, postal_code) = address
            .map(|a| (a.address_line, a.postal_code))
            .unwrap_or_default();
        Self {
            country: location.country,
            state: location.state,
            city: location.city,
            address_line,
            postal_code,
        }
    }
}

/// Single-user view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    pub id: Uuid,
    pub account_type: AccountType,
    pub role: Option<RoleRefResponse>,
    pub email: EmailResponse,
    pub phone: PhoneResponse,
    pub personal: PersonalResponse,
    pub address: AddressResponse,
    pub activation_status: ActivationStatus,
    pub access_control: Option<AccessControl>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "prestige_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserDetails> for UserDetailsResponse {
    fn from(details: UserDetails) -> Self {
        let UserDetails {
            user,
            role,
            location,
            citizenship,
        } = details;
        let personal = user.personal;
        Self {
            id: user.id,
            account_type: user.account_type,
            role: role.map(Into::into),
            email: EmailResponse {
                address: user.email.address,
                is_verified: user.email.verified,
            },
            phone: PhoneResponse {
                number: user.phone.number,
                is_verified: user.phone.verified,
            },
            personal: PersonalResponse {
                first_name: personal.first_name,
                middle_name: personal.middle_name,
                last_name: personal.last_name,
                avatar: personal.avatar,
                cover: personal.cover,
                date_of_birth: personal.date_of_birth,
                gender: personal.gender,
                citizenship,
            },
            address: AddressResponse::new(location, user.address),
            activation_status: user.activation_status,
            access_control: user.access_control,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
