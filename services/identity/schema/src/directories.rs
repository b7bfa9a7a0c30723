use sea_orm::entity::prelude::*;

/// Reference data rows. `key` is `languages` or `countries`; `value` holds one
/// language or one country (with its states and cities) as JSON.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "directories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub key: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub value: Json,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const LANGUAGES: &str = "languages";
pub const COUNTRIES: &str = "countries";
