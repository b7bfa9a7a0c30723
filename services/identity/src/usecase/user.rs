use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use prestige_auth_types::secret::SecretCodec;
use prestige_domain::account::AccountType;
use prestige_domain::pagination::{PageRequest, Paginated};

use crate::domain::directory::{CountryInfo, Location};
use crate::domain::repository::{DirectoryRepository, Mailer, RoleRepository, UserRepository};
use crate::domain::types::{AccountSettings, Profile, Role, User, UserFilter};
use crate::domain::validation::normalize_email;
use crate::error::IdentityError;
use crate::usecase::account::{ensure_contact_available, mint_secret};
use crate::usecase::directory::Locator;
use crate::usecase::mail;

/// Role `{id, name}` shown alongside a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&Role> for RoleRef {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserSummary {
    pub user: User,
    pub role: Option<RoleRef>,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user: User,
    pub role: Option<RoleRef>,
    pub location: Location,
    pub citizenship: Option<CountryInfo>,
}

// ── AddUser ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AddUserInput {
    pub role_id: Uuid,
    pub profile: Profile,
}

#[derive(Debug)]
pub struct AddUserOutput {
    pub user_id: Uuid,
    pub password_reset_token: String,
    pub email_sent: bool,
}

/// Provision an admin account from a role. The role's access control is copied
/// onto the user as a snapshot.
pub struct AddUserUseCase<U: UserRepository, R: RoleRepository, M: Mailer> {
    pub users: U,
    pub roles: R,
    pub mailer: M,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<U: UserRepository, R: RoleRepository, M: Mailer> AddUserUseCase<U, R, M> {
    pub async fn execute(&self, input: AddUserInput) -> Result<AddUserOutput, IdentityError> {
        let role = self
            .roles
            .find_by_id(input.role_id)
            .await?
            .ok_or(IdentityError::RoleNotFound)?;

        let mut profile = input.profile;
        profile.email_address = normalize_email(&profile.email_address);
        ensure_contact_available(
            &self.users,
            AccountType::Admin,
            Some(&profile.email_address),
            Some(&profile.phone_number),
        )
        .await?;

        let mut user = User::new(AccountType::Admin, profile);
        user.role_id = Some(role.id);
        user.access_control = Some(role.access_control.clone());
        user.email.verification = Some(mint_secret(
            &self.secrets,
            user.id,
            self.settings.verification_ttl,
        )?);
        let reset = mint_secret(&self.secrets, user.id, self.settings.password_reset_ttl)?;
        user.email.password_reset = Some(reset.clone());
        self.users.create(&user).await?;

        info!(user_id = %user.id, role_id = %role.id, account_type = %user.account_type, "account created");

        let email_sent = self
            .mailer
            .send(mail::access_admin_portal(&self.settings, &user, &reset.value))
            .await;

        Ok(AddUserOutput {
            user_id: user.id,
            password_reset_token: reset.value,
            email_sent,
        })
    }
}

// ── GetUsers ─────────────────────────────────────────────────────────────────

pub struct GetUsersUseCase<U: UserRepository, R: RoleRepository, D: DirectoryRepository> {
    pub users: U,
    pub roles: R,
    pub directories: D,
}

impl<U: UserRepository, R: RoleRepository, D: DirectoryRepository> GetUsersUseCase<U, R, D> {
    pub async fn execute(
        &self,
        filter: &UserFilter,
        page: PageRequest,
        lang: &str,
    ) -> Result<Paginated<UserSummary>, IdentityError> {
        let (users, total) = self.users.list(filter, page).await?;

        let mut role_ids: Vec<Uuid> = users.iter().filter_map(|u| u.role_id).collect();
        role_ids.sort_unstable();
        role_ids.dedup();
        let roles: HashMap<Uuid, RoleRef> = self
            .roles
            .find_many(&role_ids)
            .await?
            .iter()
            .map(|role| (role.id, RoleRef::from(role)))
            .collect();

        let codes = users
            .iter()
            .filter_map(|u| u.address.as_ref())
            .map(|a| a.country_code.as_str())
            .collect();
        let locator = Locator::load(&self.directories, codes, lang).await?;

        let items = users
            .iter()
            .map(|user| UserSummary {
                user: user.clone(),
                role: user.role_id.and_then(|id| roles.get(&id).cloned()),
                location: locator.location(user.address.as_ref()),
            })
            .collect();
        Ok(Paginated::new(items, page, total))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, R: RoleRepository, D: DirectoryRepository> {
    pub users: U,
    pub roles: R,
    pub directories: D,
}

impl<U: UserRepository, R: RoleRepository, D: DirectoryRepository> GetUserUseCase<U, R, D> {
    pub async fn execute(&self, id: Uuid, lang: &str) -> Result<UserDetails, IdentityError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        let role = match user.role_id {
            Some(role_id) => self.roles.find_by_id(role_id).await?,
            None => None,
        };

        let codes = user
            .address
            .as_ref()
            .map(|a| a.country_code.as_str())
            .into_iter()
            .chain(user.personal.citizenship.as_deref())
            .collect();
        let locator = Locator::load(&self.directories, codes, lang).await?;

        Ok(UserDetails {
            role: role.as_ref().map(RoleRef::from),
            location: locator.location(user.address.as_ref()),
            citizenship: locator.country(user.personal.citizenship.as_deref()),
            user,
        })
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Overwrite contact and profile data. Uniqueness is rechecked within the
/// account's own class.
pub struct UpdateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserUseCase<U> {
    pub async fn execute(&self, id: Uuid, mut profile: Profile) -> Result<(), IdentityError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        profile.email_address = normalize_email(&profile.email_address);
        let new_email =
            Some(profile.email_address.as_str()).filter(|email| *email != user.email.address);
        let new_phone =
            Some(profile.phone_number.as_str()).filter(|phone| *phone != user.phone.number);
        ensure_contact_available(&self.users, user.account_type, new_email, new_phone).await?;

        user.email.address = profile.email_address;
        user.email.pending = None;
        user.phone.number = profile.phone_number;
        user.personal = profile.personal;
        user.address = Some(profile.address);
        user.touch();
        self.users.save(&user).await?;

        info!(user_id = %user.id, "profile updated");
        Ok(())
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, id: Uuid) -> Result<(), IdentityError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;
        if user.account_type == AccountType::Admin {
            return Err(IdentityError::CannotDeleteAdminAccount);
        }
        if !self.users.delete(id).await? {
            return Err(IdentityError::UserNotFound);
        }
        info!(user_id = %id, "account deleted");
        Ok(())
    }
}
