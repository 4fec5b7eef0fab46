use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only log of search requests, written by the index sync worker.
/// Used for analytics only; never read on the search path.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "search_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(500))")]
    pub search_query: String,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub search_type: Option<String>,
    pub user_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub ip_address: Option<String>,
    pub result_count: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
