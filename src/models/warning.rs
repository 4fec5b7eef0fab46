use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum WarningStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl WarningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningStatus::Pending => "pending",
            WarningStatus::Approved => "approved",
            WarningStatus::Rejected => "rejected",
            WarningStatus::Deleted => "deleted",
        }
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum ScamCategory {
    #[sea_orm(string_value = "facebook")]
    Facebook,
    #[sea_orm(string_value = "zalo")]
    Zalo,
    #[sea_orm(string_value = "banking")]
    Banking,
    #[sea_orm(string_value = "gaming")]
    Gaming,
    #[sea_orm(string_value = "ecommerce")]
    Ecommerce,
    #[sea_orm(string_value = "investment")]
    Investment,
    #[sea_orm(string_value = "other")]
    Other,
}

impl ScamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::Facebook => "facebook",
            ScamCategory::Zalo => "zalo",
            ScamCategory::Banking => "banking",
            ScamCategory::Gaming => "gaming",
            ScamCategory::Ecommerce => "ecommerce",
            ScamCategory::Investment => "investment",
            ScamCategory::Other => "other",
        }
    }
}

/// Ordered evidence image URLs, stored as a JSON array.
#[derive(
    Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct EvidenceImages(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "warnings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(500))")]
    pub title: String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub scammer_name: String,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub bank_account: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub bank_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub facebook_link: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: ScamCategory,
    #[sea_orm(column_type = "Json")]
    pub evidence_images: EvidenceImages,
    pub status: WarningStatus,
    pub view_count: i32,
    pub search_count: i32,
    /// Number of approved warnings sharing this scammer identity, self
    /// included. Recomputed only when this warning transitions to approved.
    pub warning_count: i32,
    pub reporter_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub reporter_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub reporter_zalo: Option<String>,
    pub is_anonymous: bool,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub reporter_nickname: Option<String>,
    pub reviewer_id: Option<i32>,
    pub reviewed_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_note: Option<String>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
    pub approved_at: Option<DateTime>,
}

impl Model {
    /// Heuristic credibility score in [0, 100] for display next to a
    /// warning: evidence, traceable identifiers, admin approval and
    /// duplicate reports each add weight.
    pub fn credibility_score(&self) -> u32 {
        let mut score = 0u32;

        if !self.evidence_images.0.is_empty() {
            score += 20;
        }
        if self.bank_account.is_some() {
            score += 15;
        }
        if self.facebook_link.is_some() {
            score += 10;
        }
        if self.status == WarningStatus::Approved {
            score += 25;
        }
        score += (self.warning_count.max(0) as u32 * 5).min(30);

        score.min(100)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewerId",
        to = "super::user::Column::Id"
    )]
    Reviewer,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_warning() -> Model {
        Model {
            id: 1,
            title: "Fake shop".to_string(),
            scammer_name: "Nguyen Van A".to_string(),
            bank_account: None,
            bank_name: None,
            facebook_link: None,
            content: "Took payment, never shipped".to_string(),
            category: ScamCategory::Ecommerce,
            evidence_images: EvidenceImages::default(),
            status: WarningStatus::Pending,
            view_count: 0,
            search_count: 0,
            warning_count: 1,
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
        }
    }

    #[test]
    fn score_pending_without_evidence() {
        // warning_count 1 contributes 5
        assert_eq!(base_warning().credibility_score(), 5);
    }

    #[test]
    fn score_approved_with_full_evidence() {
        let mut w = base_warning();
        w.evidence_images = EvidenceImages(vec!["/uploads/evidence/a.jpg".to_string()]);
        w.bank_account = Some("123456789".to_string());
        w.facebook_link = Some("https://facebook.com/scammer".to_string());
        w.status = WarningStatus::Approved;
        // 20 + 15 + 10 + 25 + 5
        assert_eq!(w.credibility_score(), 75);
    }

    #[test]
    fn score_duplicate_count_is_capped() {
        let mut w = base_warning();
        w.warning_count = 100;
        assert_eq!(w.credibility_score(), 30);
    }

    #[test]
    fn score_never_exceeds_100() {
        let mut w = base_warning();
        w.evidence_images = EvidenceImages(vec!["a".to_string()]);
        w.bank_account = Some("123456789".to_string());
        w.facebook_link = Some("fb".to_string());
        w.status = WarningStatus::Approved;
        w.warning_count = 50;
        assert_eq!(w.credibility_score(), 100);
    }
}
