use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Warnings {
    Table,
    Id,
    Title,
    ScammerName,
    BankAccount,
    BankName,
    FacebookLink,
    Content,
    Category,
    EvidenceImages,
    Status,
    ViewCount,
    SearchCount,
    WarningCount,
    ReporterId,
    ReporterName,
    ReporterZalo,
    IsAnonymous,
    ReporterNickname,
    ReviewerId,
    ReviewedAt,
    ReviewNote,
    CreatedAt,
    UpdatedAt,
    ApprovedAt,
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
                    .table(Warnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warnings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warnings::Title).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Warnings::ScammerName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Warnings::BankAccount).string_len(100).null())
                    .col(ColumnDef::new(Warnings::BankName).string_len(100).null())
                    .col(ColumnDef::new(Warnings::FacebookLink).string_len(500).null())
                    .col(ColumnDef::new(Warnings::Content).text().not_null())
                    .col(
                        ColumnDef::new(Warnings::Category)
                            .string_len(50)
                            .not_null()
                            .default("other"),
                    )
                    .col(
                        ColumnDef::new(Warnings::EvidenceImages)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Warnings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Warnings::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Warnings::SearchCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Warnings::WarningCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Warnings::ReporterId).integer().null())
                    .col(ColumnDef::new(Warnings::ReporterName).string_len(255).null())
                    .col(ColumnDef::new(Warnings::ReporterZalo).string_len(50).null())
                    .col(
                        ColumnDef::new(Warnings::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Warnings::ReporterNickname)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(Warnings::ReviewerId).integer().null())
                    .col(ColumnDef::new(Warnings::ReviewedAt).timestamp().null())
                    .col(ColumnDef::new(Warnings::ReviewNote).text().null())
                    .col(
                        ColumnDef::new(Warnings::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Warnings::UpdatedAt).timestamp().null())
                    .col(ColumnDef::new(Warnings::ApprovedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warnings_reporter_id")
                            .from(Warnings::Table, Warnings::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warnings_reviewer_id")
                            .from(Warnings::Table, Warnings::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warnings::Table).to_owned())
            .await
    }
}
