use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_warnings_table;
mod m20240301_000003_create_reports_table;
mod m20240301_000004_create_comments_table;
mod m20240301_000005_create_admin_profiles_table;
mod m20240301_000006_create_search_logs_table;
mod m20240301_000007_add_warning_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_warnings_table::Migration),
            Box::new(m20240301_000003_create_reports_table::Migration),
            Box::new(m20240301_000004_create_comments_table::Migration),
            Box::new(m20240301_000005_create_admin_profiles_table::Migration),
            Box::new(m20240301_000006_create_search_logs_table::Migration),
            Box::new(m20240301_000007_add_warning_indexes::Migration),
        ]
    }
}
