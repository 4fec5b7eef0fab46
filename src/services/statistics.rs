use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{report, warning, Report, Warning, WarningStatus},
    search::{SearchIndex, StatsProviders, TopScammer, TopSearch},
    utils::mask_account,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
};

const TOP_LIST_LIMIT: usize = 10;
const RECENT_LIMIT: u64 = 20;

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentWarning {
    pub id: i32,
    pub title: String,
    pub scammer_name: String,
    /// Masked for display; never the raw account number.
    pub bank_account: String,
    pub view_count: i32,
    pub search_count: i32,
    pub warning_count: i32,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_warnings: u64,
    pub total_views: u64,
    pub total_reports: u64,
    pub top_scammers: Vec<TopScammer>,
    pub top_searches: Vec<TopSearch>,
    pub recent_warnings: Vec<RecentWarning>,
}

/// Read-only rollups over both stores. Top lists prefer the search index
/// via `StatsProviders`; everything else comes straight from the database.
pub struct StatisticsService {
    db: DatabaseConnection,
    providers: StatsProviders,
}

impl StatisticsService {
    pub fn new(db: DatabaseConnection, index: SearchIndex) -> Self {
        let providers = StatsProviders::new(db.clone(), index);
        Self { db, providers }
    }

    pub async fn dashboard(&self, days: u32) -> AppResult<DashboardStats> {
        let since = (chrono::Utc::now() - chrono::Duration::days(days as i64)).naive_utc();

        let total_warnings = Warning::find()
            .filter(warning::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;

        let total_reports = Report::find()
            .filter(report::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;

        let total_views = self.total_views_since(since).await?;

        let mut top_scammers = self.providers.top_scammers(days, TOP_LIST_LIMIT).await?;
        for scammer in &mut top_scammers {
            scammer.bank_account = scammer
                .bank_account
                .take()
                .map(|account| mask_account(&account));
        }

        // Search analytics are only meaningful over a short horizon; the
        // window is capped at one day regardless of the requested range.
        let top_searches = self
            .providers
            .top_searches(days.min(1), TOP_LIST_LIMIT)
            .await?;

        let recent_warnings = self.recent_warnings_since(since).await?;

        Ok(DashboardStats {
            total_warnings,
            total_views,
            total_reports,
            top_scammers,
            top_searches,
            recent_warnings,
        })
    }

    async fn total_views_since(&self, since: chrono::NaiveDateTime) -> AppResult<u64> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                "SELECT COALESCE(SUM(view_count), 0) AS total_views \
                 FROM warnings WHERE created_at >= $1",
                [since.into()],
            ))
            .await?
            .ok_or(AppError::Internal(anyhow::anyhow!("Sum query failed")))?;

        let total: i64 = row.try_get("", "total_views")?;
        Ok(total.max(0) as u64)
    }

    async fn recent_warnings_since(
        &self,
        since: chrono::NaiveDateTime,
    ) -> AppResult<Vec<RecentWarning>> {
        let rows = Warning::find()
            .filter(warning::Column::Status.eq(WarningStatus::Approved))
            .filter(warning::Column::CreatedAt.gte(since))
            .order_by_desc(warning::Column::CreatedAt)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|w| RecentWarning {
                id: w.id,
                title: w.title,
                scammer_name: w.scammer_name,
                bank_account: w
                    .bank_account
                    .map(|account| mask_account(&account))
                    .unwrap_or_default(),
                view_count: w.view_count,
                search_count: w.search_count,
                warning_count: w.warning_count,
                created_at: w.created_at.to_string(),
            })
            .collect())
    }
}
