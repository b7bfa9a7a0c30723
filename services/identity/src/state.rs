use std::future::Future;
use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::DatabaseConnection;

use prestige_auth_types::secret::SecretCodec;
use prestige_auth_types::token::TokenCodec;

use crate::domain::repository::{
    DirectoryRepository, Mailer, PermissionRepository, RoleRepository, UserRepository,
};
use crate::domain::types::AccountSettings;
use crate::infra::db::{
    DbDirectoryRepository, DbPermissionRepository, DbRoleRepository, DbUserRepository,
};
use crate::infra::mailer::BrevoMailer;

/// Factory for the collaborators handed to use cases. Production wires the
/// sea-orm repositories and the Brevo mailer; tests wire in-memory doubles.
pub trait Repositories: Clone + Send + Sync + 'static {
    type Users: UserRepository;
    type Roles: RoleRepository;
    type Permissions: PermissionRepository;
    type Directories: DirectoryRepository;
    type Mailer: Mailer;

    fn users(&self) -> Self::Users;
    fn roles(&self) -> Self::Roles;
    fn permissions(&self) -> Self::Permissions;
    fn directories(&self) -> Self::Directories;
    fn mailer(&self) -> Self::Mailer;

    /// Readiness probe for the backing store.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Clone)]
pub struct DbRepositories {
    pub db: DatabaseConnection,
    pub mailer: BrevoMailer,
}

impl Repositories for DbRepositories {
    type Users = DbUserRepository;
    type Roles = DbRoleRepository;
    type Permissions = DbPermissionRepository;
    type Directories = DbDirectoryRepository;
    type Mailer = BrevoMailer;

    fn users(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    fn roles(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    fn permissions(&self) -> DbPermissionRepository {
        DbPermissionRepository {
            db: self.db.clone(),
        }
    }

    fn directories(&self) -> DbDirectoryRepository {
        DbDirectoryRepository {
            db: self.db.clone(),
        }
    }

    fn mailer(&self) -> BrevoMailer {
        self.mailer.clone()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await.context("database ping")
    }
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState<R: Repositories> {
    pub repos: R,
    pub tokens: TokenCodec,
    pub secrets: SecretCodec,
    pub settings: Arc<AccountSettings>,
}

impl<R: Repositories> AppState<R> {
    pub fn user_repo(&self) -> R::Users {
        self.repos.users()
    }

    pub fn role_repo(&self) -> R::Roles {
        self.repos.roles()
    }

    pub fn permission_repo(&self) -> R::Permissions {
        self.repos.permissions()
    }

    pub fn directory_repo(&self) -> R::Directories {
        self.repos.directories()
    }

    pub fn mailer(&self) -> R::Mailer {
        self.repos.mailer()
    }
}
