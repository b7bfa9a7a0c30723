use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::AccountType).string().not_null())
                    .col(ColumnDef::new(Users::RoleId).uuid())
                    .col(ColumnDef::new(Users::EmailAddress).string().not_null())
                    .col(
                        ColumnDef::new(Users::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::VerificationToken).text())
                    .col(ColumnDef::new(Users::VerificationExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::PasswordResetToken).text())
                    .col(ColumnDef::new(Users::PasswordResetExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::PendingEmail).json_binary())
                    .col(ColumnDef::new(Users::PhoneNumber).string().not_null())
                    .col(
                        ColumnDef::new(Users::PhoneVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::PhoneOtp).json_binary())
                    .col(ColumnDef::new(Users::PasswordHash).string())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::MiddleName).string())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Personal).json_binary().not_null())
                    .col(ColumnDef::new(Users::Address).json_binary())
                    .col(
                        ColumnDef::new(Users::ActivationStatus)
                            .string()
                            .not_null()
                            .default("Inactive"),
                    )
                    .col(ColumnDef::new(Users::AccessControl).json_binary())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::AccountType)
                    .col(Users::EmailAddress)
                    .unique()
                    .name("idx_users_account_type_email_address")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::AccountType)
                    .col(Users::PhoneNumber)
                    .unique()
                    .name("idx_users_account_type_phone_number")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::PasswordResetToken)
                    .name("idx_users_password_reset_token")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::RoleId)
                    .name("idx_users_role_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    AccountType,
    RoleId,
    EmailAddress,
    EmailVerified,
    VerificationToken,
    VerificationExpiresAt,
    PasswordResetToken,
    PasswordResetExpiresAt,
    PendingEmail,
    PhoneNumber,
    PhoneVerified,
    PhoneOtp,
    PasswordHash,
    FirstName,
    MiddleName,
    LastName,
    Personal,
    Address,
    ActivationStatus,
    AccessControl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
}
