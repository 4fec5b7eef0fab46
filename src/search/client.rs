use meilisearch_sdk::client::Client;
use meilisearch_sdk::search::{SearchResults, Selectors};
use meilisearch_sdk::settings::{MinWordSizeForTypos, Settings, TypoToleranceSettings};

use crate::config::search::SearchConfig;
use crate::search::document::{SearchLogDocument, WarningDocument};
use crate::search::{IndexError, SearchType};

pub const WARNINGS_INDEX: &str = "warnings";
pub const SEARCH_LOGS_INDEX: &str = "search_logs";

/// Searchable-attribute order doubles as field weighting: Meilisearch's
/// attribute ranking rule prefers earlier attributes, standing in for the
/// per-field boosts a query-time scorer would use.
const WARNING_SEARCHABLE: [&str; 6] = [
    "scammer_name",
    "bank_account",
    "facebook_link",
    "search_combined",
    "title",
    "content",
];
const WARNING_FILTERABLE: [&str; 4] = ["status", "created_at_ts", "scammer_name", "bank_account"];
const WARNING_SORTABLE: [&str; 1] = ["created_at_ts"];
const SORT_RECENCY: [&str; 1] = ["created_at_ts:desc"];
const ONLY_BANK_ACCOUNT: [&str; 1] = ["bank_account"];
const ONLY_FACEBOOK_LINK: [&str; 1] = ["facebook_link"];

const LOG_SEARCHABLE: [&str; 1] = ["search_query"];
const LOG_FILTERABLE: [&str; 2] = ["created_at_ts", "search_query"];

const APPROVED_FILTER: &str = "status = approved";

/// Thin wrapper over the Meilisearch client. Every method returns
/// `IndexError` so callers decide between fallback and drop; none of these
/// errors may reach an HTTP response.
#[derive(Clone)]
pub struct SearchIndex {
    client: Client,
}

impl SearchIndex {
    pub fn new(config: &SearchConfig) -> Result<Self, IndexError> {
        let client = Client::new(&config.url, config.api_key.as_deref())?;
        Ok(Self { client })
    }

    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }

    /// Create/update both indexes with their settings. A settings update on
    /// a missing index creates it.
    pub async fn ensure_indexes(&self) -> Result<(), IndexError> {
        let warning_settings = Settings::new()
            .with_searchable_attributes(WARNING_SEARCHABLE)
            .with_filterable_attributes(WARNING_FILTERABLE)
            .with_sortable_attributes(WARNING_SORTABLE)
            .with_typo_tolerance(TypoToleranceSettings {
                enabled: Some(true),
                disable_on_attributes: None,
                disable_on_words: None,
                min_word_size_for_typos: Some(MinWordSizeForTypos {
                    one_typo: Some(4),
                    two_typos: Some(8),
                }),
            });
        self.client
            .index(WARNINGS_INDEX)
            .set_settings(&warning_settings)
            .await?;

        let log_settings = Settings::new()
            .with_searchable_attributes(LOG_SEARCHABLE)
            .with_filterable_attributes(LOG_FILTERABLE);
        self.client
            .index(SEARCH_LOGS_INDEX)
            .set_settings(&log_settings)
            .await?;

        Ok(())
    }

    pub async fn upsert_warning(&self, doc: &WarningDocument) -> Result<(), IndexError> {
        self.client
            .index(WARNINGS_INDEX)
            .add_or_update(std::slice::from_ref(doc), Some("id"))
            .await?;
        Ok(())
    }

    pub async fn bulk_upsert_warnings(&self, docs: &[WarningDocument]) -> Result<(), IndexError> {
        if docs.is_empty() {
            return Ok(());
        }
        self.client
            .index(WARNINGS_INDEX)
            .add_or_update(docs, Some("id"))
            .await?;
        Ok(())
    }

    pub async fn delete_warning(&self, id: i32) -> Result<(), IndexError> {
        self.client
            .index(WARNINGS_INDEX)
            .delete_document(id)
            .await?;
        Ok(())
    }

    pub async fn log_search(&self, doc: &SearchLogDocument) -> Result<(), IndexError> {
        self.client
            .index(SEARCH_LOGS_INDEX)
            .add_or_update(std::slice::from_ref(doc), Some("id"))
            .await?;
        Ok(())
    }

    /// Ranked search over approved warnings. Returns IDs in relevance order
    /// (recency as tie-break) plus the estimated total. The caller hydrates
    /// full rows from the store and must preserve this ordering.
    pub async fn search_warnings(
        &self,
        query: &str,
        search_type: Option<SearchType>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<i32>, u64), IndexError> {
        let index = self.client.index(WARNINGS_INDEX);
        let offset = (page.saturating_sub(1) * limit) as usize;

        let mut search = index.search();
        search
            .with_query(query)
            .with_filter(APPROVED_FILTER)
            .with_sort(&SORT_RECENCY)
            .with_offset(offset)
            .with_limit(limit as usize);

        match search_type {
            Some(SearchType::Phone) | Some(SearchType::BankAccount) => {
                search.with_attributes_to_search_on(&ONLY_BANK_ACCOUNT);
            }
            Some(SearchType::Facebook) => {
                search.with_attributes_to_search_on(&ONLY_FACEBOOK_LINK);
            }
            Some(SearchType::Name) | None => {}
        }

        let results: SearchResults<WarningDocument> = search.execute().await?;

        let total = results
            .estimated_total_hits
            .unwrap_or(results.hits.len()) as u64;
        let ids = results.hits.into_iter().map(|hit| hit.result.id).collect();
        Ok((ids, total))
    }

    /// Scammer-name suggestions for a prefix, deduplicated in hit order.
    pub async fn suggest_scammers(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, IndexError> {
        let index = self.client.index(WARNINGS_INDEX);

        let mut search = index.search();
        search
            .with_query(prefix)
            .with_filter(APPROVED_FILTER)
            .with_limit(limit * 3);

        let results: SearchResults<WarningDocument> = search.execute().await?;

        let mut names: Vec<String> = Vec::new();
        for hit in results.hits {
            let name = hit.result.scammer_name;
            if !names.contains(&name) {
                names.push(name);
            }
            if names.len() >= limit {
                break;
            }
        }
        Ok(names)
    }

    /// Term counts for one facet, descending, name as tie-break.
    pub async fn top_facet_values(
        &self,
        index_uid: &str,
        facet: &str,
        filter: &str,
        limit: usize,
    ) -> Result<Vec<(String, u64)>, IndexError> {
        let index = self.client.index(index_uid);
        let facets = [facet];

        let mut search = index.search();
        search
            .with_query("")
            .with_limit(0)
            .with_facets(Selectors::Some(&facets[..]));
        if !filter.is_empty() {
            search.with_filter(filter);
        }

        let results: SearchResults<serde_json::Value> = search.execute().await?;

        let mut counts: Vec<(String, u64)> = results
            .facet_distribution
            .unwrap_or_default()
            .get(facet)
            .map(|values| {
                values
                    .iter()
                    .map(|(value, count)| (value.clone(), *count as u64))
                    .collect()
            })
            .unwrap_or_default();

        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        Ok(counts)
    }

    /// First known bank account for a scammer name (facet results cannot
    /// carry sibling fields).
    pub async fn bank_account_for(&self, scammer_name: &str) -> Result<Option<String>, IndexError> {
        let index = self.client.index(WARNINGS_INDEX);
        let filter = format!(
            "{} AND scammer_name = {}",
            APPROVED_FILTER,
            quote_filter_value(scammer_name)
        );

        let mut search = index.search();
        search.with_query("").with_filter(&filter).with_limit(1);

        let results: SearchResults<WarningDocument> = search.execute().await?;
        Ok(results
            .hits
            .into_iter()
            .next()
            .and_then(|hit| hit.result.bank_account))
    }
}

/// Quote a string for use in a Meilisearch filter expression.
fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain_value() {
        assert_eq!(quote_filter_value("Nguyen Van A"), "'Nguyen Van A'");
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(quote_filter_value("O'Brien"), "'O\\'Brien'");
    }

    #[test]
    fn quote_escapes_backslashes() {
        assert_eq!(quote_filter_value("a\\b"), "'a\\\\b'");
    }
}
