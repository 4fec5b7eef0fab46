use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Publicly displayable contact card for an administrator, keyed by a
/// unique member number. 1:1 optional extension of a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "admin_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(unique)]
    pub admin_number: i32,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub facebook_main: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub facebook_backup: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub zalo: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(500))", nullable)]
    pub website: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub services: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub bank_accounts: Option<Json>,
    #[sea_orm(column_type = "Double")]
    pub insurance_fund: f64,
    pub is_public: bool,
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
