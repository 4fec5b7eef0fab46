use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::warning::{EvidenceImages, ScamCategory, WarningStatus};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[sea_orm(string_value = "scam")]
    Scam,
    #[sea_orm(string_value = "website")]
    Website,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_type: ReportType,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub scammer_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub bank_account: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub bank_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub facebook_link: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub website_url: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub website_category: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Json")]
    pub evidence_images: EvidenceImages,
    pub category: ScamCategory,
    pub status: WarningStatus,
    pub reporter_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub reporter_name: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub reporter_zalo: String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub reporter_email: String,
    pub agree_terms: bool,
    pub reviewer_id: Option<i32>,
    pub reviewed_at: Option<DateTime>,
    pub created_at: DateTime,
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
