//! Search-index plumbing: the Meilisearch client wrapper, the derived
//! document shapes, the outbound sync queue and the ranked-stats provider
//! seam. Everything in here is best-effort by contract — an unreachable
//! index must never fail a caller's primary operation.

pub mod client;
pub mod document;
pub mod provider;
pub mod sync;

pub use client::{SearchIndex, SEARCH_LOGS_INDEX, WARNINGS_INDEX};
pub use document::{SearchLogDocument, WarningDocument};
pub use provider::{RankedStatsProvider, StatsProviders, TopScammer, TopSearch};
pub use sync::{IndexEvent, IndexSync, SearchLogEntry};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Failures talking to the search index. Deliberately not an `AppError`:
/// call sites degrade to the database or drop the write instead of
/// propagating.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("search index error: {0}")]
    Meili(#[from] meilisearch_sdk::errors::Error),
}

/// Caller's hint about what kind of identifier the query string is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Phone,
    BankAccount,
    Facebook,
    Name,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Phone => "phone",
            SearchType::BankAccount => "bank_account",
            SearchType::Facebook => "facebook",
            SearchType::Name => "name",
        }
    }
}
