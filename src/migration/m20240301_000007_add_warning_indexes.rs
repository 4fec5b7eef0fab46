use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Warnings {
    Table,
    Status,
    ScammerName,
    BankAccount,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Public listings and the fallback search filter on status + recency.
        manager
            .create_index(
                Index::create()
                    .name("idx_warnings_status_created_at")
                    .table(Warnings::Table)
                    .col(Warnings::Status)
                    .col(Warnings::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Duplicate-counter recompute groups on (scammer_name, bank_account).
        manager
            .create_index(
                Index::create()
                    .name("idx_warnings_scammer_identity")
                    .table(Warnings::Table)
                    .col(Warnings::ScammerName)
                    .col(Warnings::BankAccount)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_warnings_status_created_at")
                    .table(Warnings::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_warnings_scammer_identity")
                    .table(Warnings::Table)
                    .to_owned(),
            )
            .await
    }
}
