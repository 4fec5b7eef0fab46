use std::env;

/// Connection settings for the Meilisearch instance backing ranked search
/// and top-N aggregations. The index is always optional at runtime: a dead
/// or unreachable instance degrades every caller to its database path.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub url: String,
    pub api_key: Option<String>,
}

impl SearchConfig {
    pub fn from_env() -> Self {
        let url =
            env::var("SEARCH_INDEX_URL").unwrap_or_else(|_| "http://127.0.0.1:7700".to_string());
        let api_key = env::var("SEARCH_INDEX_API_KEY").ok().filter(|k| !k.is_empty());

        Self { url, api_key }
    }
}
