use std::future::Future;

use uuid::Uuid;

use prestige_domain::account::AccountType;
use prestige_domain::pagination::PageRequest;

use crate::domain::directory::{Country, Language};
use crate::domain::types::{MailMessage, Permission, Role, User, UserFilter};
use crate::error::IdentityError;

// Methods return `impl Future + Send` rather than `async fn` so that handlers
// generic over these traits still produce `Send` futures. Implementations may
// use plain `async fn`.

/// Account persistence. `save` overwrites the whole row: last writer wins.
pub trait UserRepository: Send + Sync {
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<User>, IdentityError>> + Send;

    /// `email` is expected lowercased.
    fn find_by_email(
        &self,
        account_type: AccountType,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, IdentityError>> + Send;

    fn find_by_phone(
        &self,
        account_type: AccountType,
        phone: &str,
    ) -> impl Future<Output = Result<Option<User>, IdentityError>> + Send;

    /// Lookup by the stored password-reset token value.
    fn find_by_reset_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<User>, IdentityError>> + Send;

    fn create(&self, user: &User) -> impl Future<Output = Result<(), IdentityError>> + Send;

    fn save(&self, user: &User) -> impl Future<Output = Result<(), IdentityError>> + Send;

    /// Returns `true` if a row was deleted.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, IdentityError>> + Send;

    /// One page sorted by lowercased full name, plus the total match count.
    fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<User>, u64), IdentityError>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Role>, IdentityError>> + Send;

    /// Case-insensitive name lookup.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Role>, IdentityError>> + Send;

    fn find_many(
        &self,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<Vec<Role>, IdentityError>> + Send;

    fn create(&self, role: &Role) -> impl Future<Output = Result<(), IdentityError>> + Send;

    fn save(&self, role: &Role) -> impl Future<Output = Result<(), IdentityError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, IdentityError>> + Send;

    /// One page sorted by lowercased name, optionally filtered by a name substring.
    fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<Role>, u64), IdentityError>> + Send;
}

/// Read-only access to the static permission catalog.
pub trait PermissionRepository: Send + Sync {
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Permission>, IdentityError>> + Send;

    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Permission>, IdentityError>> + Send;

    fn find_many(
        &self,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<Vec<Permission>, IdentityError>> + Send;

    fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> impl Future<Output = Result<(Vec<Permission>, u64), IdentityError>> + Send;
}

pub trait DirectoryRepository: Send + Sync {
    fn languages(&self) -> impl Future<Output = Result<Vec<Language>, IdentityError>> + Send;

    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, IdentityError>> + Send;

    fn find_country(
        &self,
        iso3: &str,
    ) -> impl Future<Output = Result<Option<Country>, IdentityError>> + Send;
}

/// Transactional email delivery. Best effort: `false` on any failure, never an error.
pub trait Mailer: Send + Sync {
    fn send(&self, message: MailMessage) -> impl Future<Output = bool> + Send;
}
