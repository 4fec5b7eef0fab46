use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum SearchLogs {
    Table,
    Id,
    SearchQuery,
    SearchType,
    UserId,
    IpAddress,
    ResultCount,
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
                    .table(SearchLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SearchLogs::SearchQuery)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SearchLogs::SearchType).string_len(50).null())
                    .col(ColumnDef::new(SearchLogs::UserId).integer().null())
                    .col(ColumnDef::new(SearchLogs::IpAddress).string_len(50).null())
                    .col(
                        ColumnDef::new(SearchLogs::ResultCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SearchLogs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_logs_user_id")
                            .from(SearchLogs::Table, SearchLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_logs_created_at")
                    .table(SearchLogs::Table)
                    .col(SearchLogs::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchLogs::Table).to_owned())
            .await
    }
}
