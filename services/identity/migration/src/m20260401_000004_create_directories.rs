use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Supported interface languages. Country data is imported out of band.
const LANGUAGES: [(&str, &str); 5] = [
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("es", "Español"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Directories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Directories::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Directories::Key).string().not_null())
                    .col(ColumnDef::new(Directories::Value).json_binary().not_null())
                    .col(
                        ColumnDef::new(Directories::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Directories::Table)
                    .col(Directories::Key)
                    .col(Directories::Position)
                    .name("idx_directories_key_position")
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(Directories::Table).columns([
            Directories::Key,
            Directories::Value,
            Directories::Position,
        ]);
        for (position, (code, name)) in LANGUAGES.into_iter().enumerate() {
            let value = format!(r#"{{"code":"{code}","name":"{name}"}}"#);
            insert
                .values([
                    "languages".into(),
                    Expr::cust_with_values("CAST($1 AS jsonb)", [value]),
                    (position as i32).into(),
                ])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Directories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Directories {
    Table,
    Id,
    Key,
    Value,
    Position,
}
