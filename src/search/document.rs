use serde::{Deserialize, Serialize};

use crate::models::{search_log, warning};

/// Denormalized projection of an approved warning. `search_combined`
/// concatenates every identifier so that a generic query can hit across
/// fields; `created_at_ts` is a unix timestamp because Meilisearch filters
/// and sorts on numbers, not date strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningDocument {
    pub id: i32,
    pub title: String,
    pub scammer_name: String,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub facebook_link: Option<String>,
    pub content: String,
    pub category: String,
    pub status: String,
    pub search_combined: String,
    pub view_count: i32,
    pub search_count: i32,
    pub warning_count: i32,
    pub created_at_ts: i64,
}

impl From<&warning::Model> for WarningDocument {
    fn from(w: &warning::Model) -> Self {
        let search_combined = [
            w.scammer_name.as_str(),
            w.bank_account.as_deref().unwrap_or(""),
            w.facebook_link.as_deref().unwrap_or(""),
            w.title.as_str(),
            w.content.as_str(),
        ]
        .join(" ");

        Self {
            id: w.id,
            title: w.title.clone(),
            scammer_name: w.scammer_name.clone(),
            bank_account: w.bank_account.clone(),
            bank_name: w.bank_name.clone(),
            facebook_link: w.facebook_link.clone(),
            content: w.content.clone(),
            category: w.category.as_str().to_string(),
            status: w.status.as_str().to_string(),
            search_combined,
            view_count: w.view_count,
            search_count: w.search_count,
            warning_count: w.warning_count,
            created_at_ts: w.created_at.and_utc().timestamp(),
        }
    }
}

/// Projection of a `search_logs` row for the analytics index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLogDocument {
    pub id: i32,
    pub search_query: String,
    pub search_type: Option<String>,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub created_at_ts: i64,
}

impl From<&search_log::Model> for SearchLogDocument {
    fn from(log: &search_log::Model) -> Self {
        Self {
            id: log.id,
            search_query: log.search_query.clone(),
            search_type: log.search_type.clone(),
            user_id: log.user_id,
            ip_address: log.ip_address.clone(),
            created_at_ts: log.created_at.and_utc().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvidenceImages, ScamCategory, WarningStatus};

    #[test]
    fn warning_document_combines_identifiers() {
        let w = warning::Model {
            id: 7,
            title: "Fake investment group".to_string(),
            scammer_name: "Tran B".to_string(),
            bank_account: Some("9988776655".to_string()),
            bank_name: Some("VCB".to_string()),
            facebook_link: Some("https://facebook.com/tranb".to_string()),
            content: "Promised 20% monthly returns".to_string(),
            category: ScamCategory::Investment,
            evidence_images: EvidenceImages::default(),
            status: WarningStatus::Approved,
            view_count: 3,
            search_count: 1,
            warning_count: 2,
            reporter_id: None,
            reporter_name: None,
            reporter_zalo: None,
            is_anonymous: false,
            reporter_nickname: None,
            reviewer_id: None,
            reviewed_at: None,
            review_note: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
            approved_at: None,
        };

        let doc = WarningDocument::from(&w);
        assert_eq!(doc.id, 7);
        assert_eq!(doc.status, "approved");
        assert_eq!(doc.category, "investment");
        assert!(doc.search_combined.contains("Tran B"));
        assert!(doc.search_combined.contains("9988776655"));
        assert!(doc.search_combined.contains("facebook.com/tranb"));
        assert!(doc.search_combined.contains("Fake investment group"));
    }
}
