use sea_orm::entity::prelude::*;

/// Admin and customer accounts. Nested profile and access-control data is kept
/// in `jsonb` so that every account mutation is a single-row write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_type: String,
    pub role_id: Option<Uuid>,
    pub email_address: String,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub pending_email: Option<Json>,
    pub phone_number: String,
    pub phone_verified: bool,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub phone_otp: Option<Json>,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub personal: Json,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub address: Option<Json>,
    pub activation_status: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub access_control: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id",
        on_delete = "SetNull"
    )]
    Roles,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
