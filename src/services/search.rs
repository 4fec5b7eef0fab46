use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{warning, Warning, WarningModel, WarningStatus},
    search::{IndexEvent, IndexSync, SearchIndex, SearchLogEntry, SearchType, WarningDocument},
};
use sea_orm::{
    sea_query::extension::postgres::PgExpr, sea_query::Expr, ColumnTrait, Condition,
    ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
};

pub struct SearchPage {
    pub warnings: Vec<WarningModel>,
    pub total: u64,
}

/// Query-time composition of the search index and the store. The index
/// ranks, the store is authoritative for data and approval status; when the
/// index is unreachable the store answers alone, ordered by recency.
pub struct SearchService {
    db: DatabaseConnection,
    index: SearchIndex,
    sync: IndexSync,
}

impl SearchService {
    pub fn new(db: DatabaseConnection, index: SearchIndex, sync: IndexSync) -> Self {
        Self { db, index, sync }
    }

    pub async fn search(
        &self,
        query: &str,
        search_type: Option<SearchType>,
        page: u64,
        limit: u64,
        ip_address: Option<String>,
        user_id: Option<i32>,
    ) -> AppResult<SearchPage> {
        // Log first, fire-and-forget: the request never waits on analytics.
        self.sync.enqueue(IndexEvent::SearchLogged(SearchLogEntry {
            query: query.to_string(),
            search_type,
            user_id,
            ip_address,
        }));

        let (ids, total) = match self.index.search_warnings(query, search_type, page, limit).await
        {
            Ok(ranked) => ranked,
            Err(e) => {
                tracing::warn!("search index unavailable, falling back to database: {e}");
                return self.fallback_search(query, search_type, page, limit).await;
            }
        };

        if ids.is_empty() {
            return Ok(SearchPage {
                warnings: Vec::new(),
                total,
            });
        }

        // Hydrate from the store and re-check approval — the index may lag
        // behind review decisions.
        let rows = Warning::find()
            .filter(warning::Column::Id.is_in(ids.clone()))
            .filter(warning::Column::Status.eq(WarningStatus::Approved))
            .all(&self.db)
            .await?;

        // The index ranking is authoritative for ordering even though the
        // data came from the store.
        let mut by_id: HashMap<i32, WarningModel> = rows.into_iter().map(|w| (w.id, w)).collect();
        let ordered: Vec<WarningModel> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        let warnings = self.bump_search_counts(ordered).await;
        Ok(SearchPage { warnings, total })
    }

    /// Database-only search used when the index is down: case-insensitive
    /// substring match on the field the search type implies, newest first.
    async fn fallback_search(
        &self,
        query: &str,
        search_type: Option<SearchType>,
        page: u64,
        limit: u64,
    ) -> AppResult<SearchPage> {
        let pattern = format!("%{}%", query);

        let field_cond = match search_type {
            Some(SearchType::Phone) | Some(SearchType::BankAccount) => Condition::all()
                .add(Expr::col(warning::Column::BankAccount).ilike(pattern.clone())),
            Some(SearchType::Facebook) => Condition::all()
                .add(Expr::col(warning::Column::FacebookLink).ilike(pattern.clone())),
            Some(SearchType::Name) | None => Condition::any()
                .add(Expr::col(warning::Column::ScammerName).ilike(pattern.clone()))
                .add(Expr::col(warning::Column::Title).ilike(pattern.clone()))
                .add(Expr::col(warning::Column::Content).ilike(pattern.clone())),
        };

        let paginator = Warning::find()
            .filter(warning::Column::Status.eq(WarningStatus::Approved))
            .filter(field_cond)
            .order_by_desc(warning::Column::CreatedAt)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        let warnings = self.bump_search_counts(rows).await;
        Ok(SearchPage { warnings, total })
    }

    /// Increment `search_count` for every returned warning in one
    /// transaction. A failed commit rolls back only the counters; the search
    /// result itself is unaffected and still returned. After a successful
    /// commit the touched documents are re-synced to the index.
    async fn bump_search_counts(&self, mut warnings: Vec<WarningModel>) -> Vec<WarningModel> {
        if warnings.is_empty() {
            return warnings;
        }

        let result: Result<(), sea_orm::DbErr> = async {
            let txn = self.db.begin().await?;
            for w in &warnings {
                txn.execute(Statement::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    "UPDATE warnings SET search_count = search_count + 1 WHERE id = $1",
                    [w.id.into()],
                ))
                .await?;
            }
            txn.commit().await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                for w in &mut warnings {
                    w.search_count += 1;
                    self.sync
                        .enqueue(IndexEvent::WarningUpserted(WarningDocument::from(&*w)));
                }
            }
            Err(e) => tracing::warn!("search count update rolled back: {e}"),
        }

        warnings
    }

    /// Scammer-name suggestions for type-ahead, with a distinct-ILIKE
    /// database fallback.
    pub async fn suggest(&self, prefix: &str, limit: u64) -> AppResult<Vec<String>> {
        match self.index.suggest_scammers(prefix, limit as usize).await {
            Ok(names) => Ok(names),
            Err(e) => {
                tracing::warn!("suggest via index failed, using database: {e}");
                let pattern = format!("%{}%", prefix);
                let names = Warning::find()
                    .select_only()
                    .column(warning::Column::ScammerName)
                    .distinct()
                    .filter(warning::Column::Status.eq(WarningStatus::Approved))
                    .filter(Expr::col(warning::Column::ScammerName).ilike(pattern))
                    .limit(limit)
                    .into_tuple::<String>()
                    .all(&self.db)
                    .await?;
                Ok(names)
            }
        }
    }
}
