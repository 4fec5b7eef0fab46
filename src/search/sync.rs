use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use tokio::sync::mpsc;

use crate::models::search_log;
use crate::search::client::SearchIndex;
use crate::search::document::{SearchLogDocument, WarningDocument};
use crate::search::SearchType;

/// Outbound index mutation. Delivery is at-most-once and best-effort: a
/// failed event is logged and dropped, never retried, and the enqueueing
/// request has already returned by the time it is applied.
#[derive(Debug)]
pub enum IndexEvent {
    WarningUpserted(WarningDocument),
    WarningDeleted(i32),
    SearchLogged(SearchLogEntry),
}

#[derive(Debug, Clone)]
pub struct SearchLogEntry {
    pub query: String,
    pub search_type: Option<SearchType>,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
}

/// Handle to the single index-sync worker task. Cheap to clone; handlers
/// enqueue and move on.
#[derive(Clone)]
pub struct IndexSync {
    tx: mpsc::UnboundedSender<IndexEvent>,
}

impl IndexSync {
    /// Spawn the worker and return the sending handle. The worker owns the
    /// only receiver and runs for the life of the process.
    pub fn spawn(db: DatabaseConnection, index: SearchIndex) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<IndexEvent>();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = apply(&db, &index, event).await {
                    tracing::warn!("index sync event dropped: {e}");
                }
            }
            tracing::debug!("index sync worker stopped");
        });

        Self { tx }
    }

    pub fn enqueue(&self, event: IndexEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("index sync worker is gone; event dropped");
        }
    }
}

async fn apply(
    db: &DatabaseConnection,
    index: &SearchIndex,
    event: IndexEvent,
) -> anyhow::Result<()> {
    match event {
        IndexEvent::WarningUpserted(doc) => {
            index.upsert_warning(&doc).await?;
        }
        IndexEvent::WarningDeleted(id) => {
            index.delete_warning(id).await?;
        }
        IndexEvent::SearchLogged(entry) => {
            // The store owns search logs; the index holds a projection. The
            // row is written first so the database fallback for top searches
            // has real data even when the index is down.
            let row = search_log::ActiveModel {
                search_query: Set(entry.query),
                search_type: Set(entry.search_type.map(|t| t.as_str().to_string())),
                user_id: Set(entry.user_id),
                ip_address: Set(entry.ip_address),
                result_count: Set(0),
                created_at: Set(chrono::Utc::now().naive_utc()),
                ..Default::default()
            };
            let saved = row.insert(db).await?;
            index.log_search(&SearchLogDocument::from(&saved)).await?;
        }
    }
    Ok(())
}
