use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prestige_core::sea_ext::{OrderByLower, contains_ci, eq_ci};
use prestige_domain::account::AccountType;
use prestige_domain::pagination::PageRequest;
use prestige_identity_schema::{directories, permissions, roles, users};

use crate::domain::directory::{Country, Language};
use crate::domain::repository::{
    DirectoryRepository, PermissionRepository, RoleRepository, UserRepository,
};
use crate::domain::types::{
    Address, EmailState, Gender, PendingEmail, Permission, Personal, PhoneOtp, PhoneState,
    Resource, Role, SecretToken, User, UserFilter,
};
use crate::error::IdentityError;

fn page_bounds<E: EntityTrait>(query: Select<E>, page: PageRequest) -> Select<E> {
    query.offset(page.offset()).limit(page.page_size)
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

/// `concat_ws(' ', first_name, middle_name, last_name)`; a NULL middle name is skipped.
fn full_name_expr() -> SimpleExpr {
    Func::cust(Alias::new("concat_ws"))
        .arg(Expr::val(" "))
        .arg(Expr::col(users::Column::FirstName))
        .arg(Expr::col(users::Column::MiddleName))
        .arg(Expr::col(users::Column::LastName))
        .into()
}

/// Unique index hits on insert or update become the matching conflict code.
fn user_write_error(err: DbErr, context: &'static str) -> IdentityError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("phone_number") => {
            IdentityError::PhoneAlreadyExists
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => IdentityError::EmailAlreadyExists,
        _ => anyhow::Error::new(err).context(context).into(),
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(
        &self,
        account_type: AccountType,
        email: &str,
    ) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::AccountType.eq(account_type.as_str()))
            .filter(users::Column::EmailAddress.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_phone(
        &self,
        account_type: AccountType,
        phone: &str,
    ) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::AccountType.eq(account_type.as_str()))
            .filter(users::Column::PhoneNumber.eq(phone))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::PasswordResetToken.eq(token))
            .one(&self.db)
            .await
            .context("find user by password reset token")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), IdentityError> {
        user_to_active_model(user)?
            .insert(&self.db)
            .await
            .map_err(|e| user_write_error(e, "create user"))?;
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), IdentityError> {
        user_to_active_model(user)?
            .update(&self.db)
            .await
            .map_err(|e| user_write_error(e, "save user"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IdentityError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), IdentityError> {
        let mut query = users::Entity::find();
        if let Some(account_type) = filter.account_type {
            query = query.filter(users::Column::AccountType.eq(account_type.as_str()));
        }
        if let Some(role_id) = filter.role_id {
            query = query.filter(users::Column::RoleId.eq(role_id));
        }
        if let Some(status) = filter.activation_status {
            query = query.filter(users::Column::ActivationStatus.eq(status.as_str()));
        }
        if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(full_name_expr(), q))
                    .add(contains_ci(Expr::col(users::Column::EmailAddress), q))
                    .add(contains_ci(Expr::col(users::Column::PhoneNumber), q)),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = page_bounds(query.order_by_lower(full_name_expr(), Order::Asc), page)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;

        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((users, total))
    }
}

/// Profile fields without a column of their own, stored in `users.personal`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalExtras {
    #[serde(default)]
    avatar: Option<Resource>,
    #[serde(default)]
    cover: Option<Resource>,
    #[serde(default)]
    date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    gender: Option<Gender>,
    #[serde(default)]
    citizenship: Option<String>,
}

fn secret(
    value: Option<String>,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Option<SecretToken> {
    Some(SecretToken {
        value: value?,
        expires_at: expires_at?,
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    value: Option<serde_json::Value>,
    what: &'static str,
) -> Result<Option<T>, IdentityError> {
    let parsed = value
        .filter(|v| !v.is_null())
        .map(serde_json::from_value)
        .transpose()
        .context(what)?;
    Ok(parsed)
}

fn to_json<T: Serialize>(
    value: Option<&T>,
    what: &'static str,
) -> Result<Option<serde_json::Value>, IdentityError> {
    let json = value.map(serde_json::to_value).transpose().context(what)?;
    Ok(json)
}

fn user_from_model(model: users::Model) -> Result<User, IdentityError> {
    let extras: PersonalExtras =
        from_json(Some(model.personal), "decode users.personal")?.unwrap_or_default();
    let pending: Option<PendingEmail> = from_json(model.pending_email, "decode users.pending_email")?;
    let otp: Option<PhoneOtp> = from_json(model.phone_otp, "decode users.phone_otp")?;
    let address: Option<Address> = from_json(model.address, "decode users.address")?;

    Ok(User {
        id: model.id,
        account_type: model
            .account_type
            .parse()
            .context("decode users.account_type")?,
        role_id: model.role_id,
        email: EmailState {
            address: model.email_address,
            verified: model.email_verified,
            verification: secret(model.verification_token, model.verification_expires_at),
            password_reset: secret(model.password_reset_token, model.password_reset_expires_at),
            pending,
        },
        phone: PhoneState {
            number: model.phone_number,
            verified: model.phone_verified,
            otp,
        },
        password_hash: model.password_hash,
        personal: Personal {
            first_name: model.first_name,
            middle_name: model.middle_name,
            last_name: model.last_name,
            avatar: extras.avatar,
            cover: extras.cover,
            date_of_birth: extras.date_of_birth,
            gender: extras.gender,
            citizenship: extras.citizenship,
        },
        address,
        activation_status: model
            .activation_status
            .parse()
            .context("decode users.activation_status")?,
        access_control: from_json(model.access_control, "decode users.access_control")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn user_to_active_model(user: &User) -> Result<users::ActiveModel, IdentityError> {
    let personal = &user.personal;
    let extras = PersonalExtras {
        avatar: personal.avatar.clone(),
        cover: personal.cover.clone(),
        date_of_birth: personal.date_of_birth,
        gender: personal.gender,
        citizenship: personal.citizenship.clone(),
    };
    let verification = user.email.verification.as_ref();
    let reset = user.email.password_reset.as_ref();

    Ok(users::ActiveModel {
        id: Set(user.id),
        account_type: Set(user.account_type.as_str().to_owned()),
        role_id: Set(user.role_id),
        email_address: Set(user.email.address.clone()),
        email_verified: Set(user.email.verified),
        verification_token: Set(verification.map(|t| t.value.clone())),
        verification_expires_at: Set(verification.map(|t| t.expires_at)),
        password_reset_token: Set(reset.map(|t| t.value.clone())),
        password_reset_expires_at: Set(reset.map(|t| t.expires_at)),
        pending_email: Set(to_json(user.email.pending.as_ref(), "encode pending email")?),
        phone_number: Set(user.phone.number.clone()),
        phone_verified: Set(user.phone.verified),
        phone_otp: Set(to_json(user.phone.otp.as_ref(), "encode phone otp")?),
        password_hash: Set(user.password_hash.clone()),
        first_name: Set(personal.first_name.clone()),
        middle_name: Set(personal.middle_name.clone()),
        last_name: Set(personal.last_name.clone()),
        personal: Set(serde_json::to_value(&extras).context("encode personal")?),
        address: Set(to_json(user.address.as_ref(), "encode address")?),
        activation_status: Set(user.activation_status.as_str().to_owned()),
        access_control: Set(to_json(user.access_control.as_ref(), "encode access control")?),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    })
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

fn role_write_error(err: DbErr, context: &'static str) -> IdentityError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => IdentityError::RoleAlreadyExists,
        _ => anyhow::Error::new(err).context(context).into(),
    }
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, IdentityError> {
        let model = roles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find role by id")?;
        model.map(role_from_model).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, IdentityError> {
        let model = roles::Entity::find()
            .filter(eq_ci(Expr::col(roles::Column::Name), name))
            .one(&self.db)
            .await
            .context("find role by name")?;
        model.map(role_from_model).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Role>, IdentityError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = roles::Entity::find()
            .filter(roles::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find roles by ids")?;
        models.into_iter().map(role_from_model).collect()
    }

    async fn create(&self, role: &Role) -> Result<(), IdentityError> {
        role_to_active_model(role)?
            .insert(&self.db)
            .await
            .map_err(|e| role_write_error(e, "create role"))?;
        Ok(())
    }

    async fn save(&self, role: &Role) -> Result<(), IdentityError> {
        role_to_active_model(role)?
            .update(&self.db)
            .await
            .map_err(|e| role_write_error(e, "save role"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, IdentityError> {
        let result = roles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete role")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Role>, u64), IdentityError> {
        let mut query = roles::Entity::find();
        if let Some(q) = q.filter(|q| !q.is_empty()) {
            query = query.filter(contains_ci(Expr::col(roles::Column::Name), q));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count roles")?;
        let models = page_bounds(
            query.order_by_lower(Expr::col(roles::Column::Name), Order::Asc),
            page,
        )
        .all(&self.db)
        .await
        .context("list roles")?;

        let roles = models
            .into_iter()
            .map(role_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((roles, total))
    }
}

fn role_from_model(model: roles::Model) -> Result<Role, IdentityError> {
    Ok(Role {
        id: model.id,
        name: model.name,
        description: model.description,
        access_control: serde_json::from_value(model.access_control)
            .context("decode roles.access_control")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn role_to_active_model(role: &Role) -> Result<roles::ActiveModel, IdentityError> {
    Ok(roles::ActiveModel {
        id: Set(role.id),
        name: Set(role.name.clone()),
        description: Set(role.description.clone()),
        access_control: Set(
            serde_json::to_value(&role.access_control).context("encode access control")?
        ),
        created_at: Set(role.created_at),
        updated_at: Set(role.updated_at),
    })
}

// ── Permission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPermissionRepository {
    pub db: DatabaseConnection,
}

impl PermissionRepository for DbPermissionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, IdentityError> {
        let model = permissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find permission by id")?;
        Ok(model.map(permission_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>, IdentityError> {
        let model = permissions::Entity::find()
            .filter(permissions::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find permission by code")?;
        Ok(model.map(permission_from_model))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Permission>, IdentityError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = permissions::Entity::find()
            .filter(permissions::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find permissions by ids")?;
        Ok(models.into_iter().map(permission_from_model).collect())
    }

    async fn list(
        &self,
        q: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Permission>, u64), IdentityError> {
        let mut query = permissions::Entity::find();
        if let Some(q) = q.filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(Expr::col(permissions::Column::Name), q))
                    .add(contains_ci(Expr::col(permissions::Column::Code), q)),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count permissions")?;
        let models = page_bounds(
            query.order_by_lower(Expr::col(permissions::Column::Name), Order::Asc),
            page,
        )
        .all(&self.db)
        .await
        .context("list permissions")?;
        Ok((
            models.into_iter().map(permission_from_model).collect(),
            total,
        ))
    }
}

fn permission_from_model(model: permissions::Model) -> Permission {
    Permission {
        id: model.id,
        code: model.code,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Directory repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDirectoryRepository {
    pub db: DatabaseConnection,
}

impl DbDirectoryRepository {
    async fn entries(&self, key: &str) -> Result<Vec<directories::Model>, IdentityError> {
        let models = directories::Entity::find()
            .filter(directories::Column::Key.eq(key))
            .order_by_asc(directories::Column::Position)
            .all(&self.db)
            .await
            .with_context(|| format!("list {key} directory"))?;
        Ok(models)
    }
}

impl DirectoryRepository for DbDirectoryRepository {
    async fn languages(&self) -> Result<Vec<Language>, IdentityError> {
        let languages = self
            .entries(directories::LANGUAGES)
            .await?
            .into_iter()
            .map(|model| serde_json::from_value(model.value))
            .collect::<Result<Vec<_>, _>>()
            .context("decode language entry")?;
        Ok(languages)
    }

    async fn countries(&self) -> Result<Vec<Country>, IdentityError> {
        let countries = self
            .entries(directories::COUNTRIES)
            .await?
            .into_iter()
            .map(|model| serde_json::from_value(model.value))
            .collect::<Result<Vec<_>, _>>()
            .context("decode country entry")?;
        Ok(countries)
    }

    async fn find_country(&self, iso3: &str) -> Result<Option<Country>, IdentityError> {
        let model = directories::Entity::find()
            .filter(directories::Column::Key.eq(directories::COUNTRIES))
            .filter(Expr::expr(Expr::cust("value->>'iso3'")).eq(iso3.to_uppercase()))
            .one(&self.db)
            .await
            .context("find country")?;
        let country = model
            .map(|model| serde_json::from_value(model.value))
            .transpose()
            .context("decode country entry")?;
        Ok(country)
    }
}
