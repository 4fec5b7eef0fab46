use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum AdminProfiles {
    Table,
    Id,
    UserId,
    AdminNumber,
    FacebookMain,
    FacebookBackup,
    Zalo,
    Website,
    Services,
    BankAccounts,
    InsuranceFund,
    IsPublic,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::AdminNumber)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::FacebookMain)
                            .string_len(500)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::FacebookBackup)
                            .string_len(500)
                            .null(),
                    )
                    .col(ColumnDef::new(AdminProfiles::Zalo).string_len(50).null())
                    .col(ColumnDef::new(AdminProfiles::Website).string_len(500).null())
                    .col(ColumnDef::new(AdminProfiles::Services).json().null())
                    .col(ColumnDef::new(AdminProfiles::BankAccounts).json().null())
                    .col(
                        ColumnDef::new(AdminProfiles::InsuranceFund)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_profiles_user_id")
                            .from(AdminProfiles::Table, AdminProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminProfiles::Table).to_owned())
            .await
    }
}
