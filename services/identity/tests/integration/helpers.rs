use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use prestige_auth_types::secret::SecretPayload;
use prestige_domain::access::{AccessControl, AccessType, PermissionCode, PermissionGrant};
use prestige_domain::account::{AccountType, ActivationStatus};
use prestige_domain::pagination::PageRequest;
use prestige_testing::auth::{test_secret_codec, test_token_codec};

use prestige_identity::domain::directory::{Country, Language};
use prestige_identity::domain::repository::{
    DirectoryRepository, Mailer, PermissionRepository, RoleRepository, UserRepository,
};
use prestige_identity::domain::types::{
    AccountSettings, Address, MailMessage, MailTemplates, Permission, Personal, Profile, Role,
    SecretToken, User, UserFilter,
};
use prestige_identity::error::IdentityError;
use prestige_identity::infra::password::hash_password;
use prestige_identity::state::{AppState, Repositories};

pub const PASSWORD: &str = "correct horse";

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.page_size as usize)
        .cloned()
        .collect()
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

fn matches_filter(user: &User, filter: &UserFilter) -> bool {
    let q = filter.q.as_deref().map(str::to_lowercase);
    filter.account_type.is_none_or(|t| t == user.account_type)
        && filter.role_id.is_none_or(|id| user.role_id == Some(id))
        && filter
            .activation_status
            .is_none_or(|s| s == user.activation_status)
        && q.is_none_or(|q| {
            user.personal.full_name().to_lowercase().contains(&q)
                || user.email.address.to_lowercase().contains(&q)
                || user.phone.number.to_lowercase().contains(&q)
        })
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        Ok(self.get(id))
    }

    async fn find_by_email(
        &self,
        account_type: AccountType,
        email: &str,
    ) -> Result<Option<User>, IdentityError> {
        Ok(self.find(|u| u.account_type == account_type && u.email.address == email))
    }

    async fn find_by_phone(
        &self,
        account_type: AccountType,
        phone: &str,
    ) -> Result<Option<User>, IdentityError> {
        Ok(self.find(|u| u.account_type == account_type && u.phone.number == phone))
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, IdentityError> {
        Ok(self.find(|u| {
            u.email
                .password_reset
                .as_ref()
                .is_some_and(|r| r.value == token)
        }))
    }

    async fn create(&self, user: &User) -> Result<(), IdentityError> {
        self.insert(user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), IdentityError> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IdentityError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), IdentityError> {
        let mut matched: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches_filter(u, filter))
            .cloned()
            .collect();
        matched.sort_by_key(|u| (u.personal.full_name().to_lowercase(), u.id));
        Ok((page_of(&matched, page), matched.len() as u64))
    }
}

// ── MockRoleRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRoleRepo {
    pub roles: Arc<Mutex<Vec<Role>>>,
}

impl MockRoleRepo {
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles: Arc::new(Mutex::new(roles)),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Role> {
        self.roles.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }
}

impl RoleRepository for MockRoleRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, IdentityError> {
        Ok(self.get(id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, IdentityError> {
        let name = name.to_lowercase();
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name.to_lowercase() == name)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Role>, IdentityError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn create(&self, role: &Role) -> Result<(), IdentityError> {
        self.roles.lock().unwrap().push(role.clone());
        Ok(())
    }

    async fn save(&self, role: &Role) -> Result<(), IdentityError> {
        let mut roles = self.roles.lock().unwrap();
        if let Some(existing) = roles.iter_mut().find(|r| r.id == role.id) {
            *existing = role.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IdentityError> {
        let mut roles = self.roles.lock().unwrap();
        let before = roles.len();
        roles.retain(|r| r.id != id);
        Ok(roles.len() < before)
    }

    async fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Role>, u64), IdentityError> {
        let q = q.map(str::to_lowercase);
        let mut matched: Vec<Role> = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| q.as_deref().is_none_or(|q| r.name.to_lowercase().contains(q)))
            .cloned()
            .collect();
        matched.sort_by_key(|r| r.name.to_lowercase());
        Ok((page_of(&matched, page), matched.len() as u64))
    }
}

// ── MockPermissionRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPermissionRepo {
    pub permissions: Arc<Vec<Permission>>,
}

impl MockPermissionRepo {
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self {
            permissions: Arc::new(permissions),
        }
    }

    pub fn id_of(&self, code: PermissionCode) -> Uuid {
        self.permissions
            .iter()
            .find(|p| p.code == code.as_str())
            .map(|p| p.id)
            .unwrap()
    }
}

impl PermissionRepository for MockPermissionRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, IdentityError> {
        Ok(self.permissions.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>, IdentityError> {
        Ok(self.permissions.iter().find(|p| p.code == code).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Permission>, IdentityError> {
        Ok(self
            .permissions
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Permission>, u64), IdentityError> {
        let q = q.map(str::to_lowercase);
        let mut matched: Vec<Permission> = self
            .permissions
            .iter()
            .filter(|p| {
                q.as_deref().is_none_or(|q| {
                    p.name.to_lowercase().contains(q) || p.code.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.name.to_lowercase());
        Ok((page_of(&matched, page), matched.len() as u64))
    }
}

// ── MockDirectoryRepo ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDirectoryRepo {
    pub languages: Arc<Vec<Language>>,
    pub countries: Arc<Vec<Country>>,
}

impl Default for MockDirectoryRepo {
    fn default() -> Self {
        Self {
            languages: Arc::new(vec![
                Language {
                    code: "en".into(),
                    name: "English".into(),
                },
                Language {
                    code: "fr".into(),
                    name: "Français".into(),
                },
            ]),
            countries: Arc::new(vec![france(), germany()]),
        }
    }
}

impl DirectoryRepository for MockDirectoryRepo {
    async fn languages(&self) -> Result<Vec<Language>, IdentityError> {
        Ok(self.languages.to_vec())
    }

    async fn countries(&self) -> Result<Vec<Country>, IdentityError> {
        Ok(self.countries.to_vec())
    }

    async fn find_country(&self, iso3: &str) -> Result<Option<Country>, IdentityError> {
        let iso3 = iso3.to_uppercase();
        Ok(self.countries.iter().find(|c| c.iso3 == iso3).cloned())
    }
}

pub fn france() -> Country {
    serde_json::from_value(serde_json::json!({
        "iso2": "FR",
        "iso3": "FRA",
        "name": {"default": "France", "translations": {"de": "Frankreich"}},
        "states": [{
            "id": "75",
            "name": {"default": "Paris"},
            "cities": [{"id": "PAR", "name": {"default": "Paris", "translations": {"it": "Parigi"}}}]
        }]
    }))
    .unwrap()
}

pub fn germany() -> Country {
    serde_json::from_value(serde_json::json!({
        "iso2": "DE",
        "iso3": "DEU",
        "name": {"default": "Germany", "translations": {"de": "Deutschland"}},
        "states": []
    }))
    .unwrap()
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

/// Records every message. `deliver = false` simulates a provider outage.
#[derive(Clone)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<MailMessage>>>,
    pub deliver: bool,
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self {
            sent: Arc::default(),
            deliver: true,
        }
    }
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            deliver: false,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> bool {
        self.sent.lock().unwrap().push(message);
        self.deliver
    }
}

// ── MockRepositories ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRepositories {
    pub users: MockUserRepo,
    pub roles: MockRoleRepo,
    pub permissions: MockPermissionRepo,
    pub directories: MockDirectoryRepo,
    pub mailer: RecordingMailer,
}

impl MockRepositories {
    /// Empty stores plus the static permission catalog.
    pub fn new() -> Self {
        Self {
            permissions: MockPermissionRepo::new(catalog()),
            ..Default::default()
        }
    }
}

impl Repositories for MockRepositories {
    type Users = MockUserRepo;
    type Roles = MockRoleRepo;
    type Permissions = MockPermissionRepo;
    type Directories = MockDirectoryRepo;
    type Mailer = RecordingMailer;

    fn users(&self) -> MockUserRepo {
        self.users.clone()
    }

    fn roles(&self) -> MockRoleRepo {
        self.roles.clone()
    }

    fn permissions(&self) -> MockPermissionRepo {
        self.permissions.clone()
    }

    fn directories(&self) -> MockDirectoryRepo {
        self.directories.clone()
    }

    fn mailer(&self) -> RecordingMailer {
        self.mailer.clone()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn test_state(repos: MockRepositories) -> AppState<MockRepositories> {
    AppState {
        repos,
        tokens: test_token_codec(),
        secrets: test_secret_codec(),
        settings: Arc::new(settings()),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn settings() -> AccountSettings {
    AccountSettings {
        verification_ttl: Duration::days(1),
        password_reset_ttl: Duration::days(1),
        admin_portal_url: "https://admin.example.com".into(),
        customer_portal_url: "https://example.com/".into(),
        templates: MailTemplates {
            verify_account: 1,
            reset_password: 2,
            access_admin_portal: 3,
        },
    }
}

pub fn catalog() -> Vec<Permission> {
    let now = Utc::now();
    PermissionCode::ALL
        .into_iter()
        .map(|code| Permission {
            id: Uuid::now_v7(),
            code: code.as_str().to_owned(),
            name: code.as_str().to_owned(),
            description: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

pub fn profile(email: &str, phone: &str) -> Profile {
    Profile {
        email_address: email.to_owned(),
        phone_number: phone.to_owned(),
        personal: Personal {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        },
        address: Address {
            country_code: "FRA".into(),
            state_id: Some("75".into()),
            city_id: Some("PAR".into()),
            address_line: None,
            postal_code: None,
        },
    }
}

/// Verified, password-holding, active account.
pub fn onboarded_user(account_type: AccountType, email: &str) -> User {
    let phone = format!("+{}", &Uuid::new_v4().simple().to_string()[..12]);
    let mut user = User::new(account_type, profile(email, &phone));
    user.email.verified = true;
    user.password_hash = Some(hash_password(PASSWORD).unwrap());
    user.activation_status = ActivationStatus::Active;
    user
}

/// Admin whose snapshot grants exactly `grants`.
pub fn admin_with(grants: Vec<(Uuid, AccessType)>) -> User {
    let mut user = onboarded_user(AccountType::Admin, "admin@example.com");
    user.access_control = Some(AccessControl {
        permissions: grants
            .into_iter()
            .map(|(permission_id, access_type)| PermissionGrant {
                permission_id,
                access_type,
            })
            .collect(),
        has_all_permissions: false,
    });
    user
}

pub fn superuser() -> User {
    let mut user = onboarded_user(AccountType::Admin, "root@example.com");
    user.access_control = Some(AccessControl {
        permissions: Vec::new(),
        has_all_permissions: true,
    });
    user
}

pub fn role(name: &str) -> Role {
    let now = Utc::now();
    Role {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        description: None,
        access_control: AccessControl::default(),
        created_at: now,
        updated_at: now,
    }
}

/// Encrypted secret for `user_id` that expires `ttl` from now.
pub fn secret_for(user_id: Uuid, ttl: Duration) -> SecretToken {
    let value = test_secret_codec()
        .encrypt(&SecretPayload::fresh(user_id))
        .unwrap();
    SecretToken::new(value, ttl)
}
