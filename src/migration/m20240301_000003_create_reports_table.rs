use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    ReportType,
    ScammerName,
    BankAccount,
    BankName,
    FacebookLink,
    WebsiteUrl,
    WebsiteCategory,
    Content,
    EvidenceImages,
    Category,
    Status,
    ReporterId,
    ReporterName,
    ReporterZalo,
    ReporterEmail,
    AgreeTerms,
    ReviewerId,
    ReviewedAt,
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
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::ReportType).string_len(50).not_null())
                    .col(ColumnDef::new(Reports::ScammerName).string_len(255).null())
                    .col(ColumnDef::new(Reports::BankAccount).string_len(100).null())
                    .col(ColumnDef::new(Reports::BankName).string_len(100).null())
                    .col(ColumnDef::new(Reports::FacebookLink).string_len(500).null())
                    .col(ColumnDef::new(Reports::WebsiteUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Reports::WebsiteCategory)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(Reports::Content).text().not_null())
                    .col(
                        ColumnDef::new(Reports::EvidenceImages)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Reports::Category)
                            .string_len(50)
                            .not_null()
                            .default("other"),
                    )
                    .col(
                        ColumnDef::new(Reports::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Reports::ReporterId).integer().null())
                    .col(
                        ColumnDef::new(Reports::ReporterName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::ReporterZalo)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::ReporterEmail)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::AgreeTerms)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Reports::ReviewerId).integer().null())
                    .col(ColumnDef::new(Reports::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_reporter_id")
                            .from(Reports::Table, Reports::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_reviewer_id")
                            .from(Reports::Table, Reports::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_status")
                    .table(Reports::Table)
                    .col(Reports::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_type")
                    .table(Reports::Table)
                    .col(Reports::ReportType)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}
