use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::search::client::{SearchIndex, SEARCH_LOGS_INDEX, WARNINGS_INDEX};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopScammer {
    pub scammer_name: String,
    pub bank_account: Option<String>,
    pub warning_count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopSearch {
    pub query: String,
    pub search_count: u64,
}

/// One interface, two backings: the index computes top lists from facet
/// distributions, the database from grouped counts. Call sites go through
/// `StatsProviders` and never branch on which one answered.
#[async_trait]
pub trait RankedStatsProvider: Send + Sync {
    async fn top_scammers(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopScammer>>;
    async fn top_searches(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopSearch>>;
}

fn window_cutoff_ts(days: u32) -> i64 {
    (chrono::Utc::now() - chrono::Duration::days(days as i64)).timestamp()
}

fn window_cutoff_naive(days: u32) -> chrono::NaiveDateTime {
    (chrono::Utc::now() - chrono::Duration::days(days as i64)).naive_utc()
}

pub struct IndexStatsProvider {
    index: SearchIndex,
}

impl IndexStatsProvider {
    pub fn new(index: SearchIndex) -> Self {
        Self { index }
    }
}

#[async_trait]
impl RankedStatsProvider for IndexStatsProvider {
    async fn top_scammers(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopScammer>> {
        let filter = format!(
            "status = approved AND created_at_ts >= {}",
            window_cutoff_ts(days)
        );
        let counts = self
            .index
            .top_facet_values(WARNINGS_INDEX, "scammer_name", &filter, limit)
            .await?;

        let mut out = Vec::with_capacity(counts.len());
        for (scammer_name, warning_count) in counts {
            let bank_account = match self.index.bank_account_for(&scammer_name).await {
                Ok(account) => account,
                Err(e) => {
                    tracing::warn!("bank account lookup failed for '{scammer_name}': {e}");
                    None
                }
            };
            out.push(TopScammer {
                scammer_name,
                bank_account,
                warning_count,
            });
        }
        Ok(out)
    }

    async fn top_searches(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopSearch>> {
        let filter = format!("created_at_ts >= {}", window_cutoff_ts(days));
        let counts = self
            .index
            .top_facet_values(SEARCH_LOGS_INDEX, "search_query", &filter, limit)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(query, search_count)| TopSearch {
                query,
                search_count,
            })
            .collect())
    }
}

pub struct DbStatsProvider {
    db: DatabaseConnection,
}

impl DbStatsProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RankedStatsProvider for DbStatsProvider {
    async fn top_scammers(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopScammer>> {
        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                "SELECT scammer_name, bank_account, COUNT(id) AS warning_count \
                 FROM warnings \
                 WHERE status = 'approved' AND created_at >= $1 \
                 GROUP BY scammer_name, bank_account \
                 ORDER BY warning_count DESC, scammer_name ASC \
                 LIMIT $2",
                [
                    window_cutoff_naive(days).into(),
                    (limit as i64).into(),
                ],
            ))
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(TopScammer {
                scammer_name: row.try_get("", "scammer_name")?,
                bank_account: row.try_get("", "bank_account")?,
                warning_count: row.try_get::<i64>("", "warning_count")? as u64,
            });
        }
        Ok(out)
    }

    async fn top_searches(&self, days: u32, limit: usize) -> anyhow::Result<Vec<TopSearch>> {
        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                "SELECT search_query, COUNT(id) AS search_count \
                 FROM search_logs \
                 WHERE created_at >= $1 \
                 GROUP BY search_query \
                 ORDER BY search_count DESC, search_query ASC \
                 LIMIT $2",
                [
                    window_cutoff_naive(days).into(),
                    (limit as i64).into(),
                ],
            ))
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(TopSearch {
                query: row.try_get("", "search_query")?,
                search_count: row.try_get::<i64>("", "search_count")? as u64,
            });
        }
        Ok(out)
    }
}

/// Health-checked selection between the two providers. The index answers
/// when reachable; any failure (or an unhealthy instance) falls through to
/// the database without surfacing an error.
pub struct StatsProviders {
    index: SearchIndex,
    via_index: IndexStatsProvider,
    via_db: DbStatsProvider,
}

impl StatsProviders {
    pub fn new(db: DatabaseConnection, index: SearchIndex) -> Self {
        Self {
            via_index: IndexStatsProvider::new(index.clone()),
            via_db: DbStatsProvider::new(db),
            index,
        }
    }

    pub async fn top_scammers(&self, days: u32, limit: usize) -> AppResult<Vec<TopScammer>> {
        if self.index.is_healthy().await {
            match self.via_index.top_scammers(days, limit).await {
                Ok(list) => return Ok(list),
                Err(e) => tracing::warn!("index top_scammers failed, using database: {e}"),
            }
        }
        self.via_db
            .top_scammers(days, limit)
            .await
            .map_err(AppError::Internal)
    }

    pub async fn top_searches(&self, days: u32, limit: usize) -> AppResult<Vec<TopSearch>> {
        if self.index.is_healthy().await {
            match self.via_index.top_searches(days, limit).await {
                Ok(list) => return Ok(list),
                Err(e) => tracing::warn!("index top_searches failed, using database: {e}"),
            }
        }
        self.via_db
            .top_searches(days, limit)
            .await
            .map_err(AppError::Internal)
    }
}
