use crate::{
    error::{AppError, AppResult},
    models::{comment, Comment, CommentModel, UserModel, Warning, WarningStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Comment on a warning. Only approved warnings accept comments; a
    /// pending/rejected/deleted target reads as not found to the caller.
    pub async fn create(
        &self,
        warning_id: i32,
        user_id: i32,
        content: &str,
        is_verified_victim: bool,
    ) -> AppResult<CommentModel> {
        let warning = Warning::find_by_id(warning_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        if warning.status != WarningStatus::Approved {
            return Err(AppError::NotFound);
        }

        let now = chrono::Utc::now().naive_utc();
        let new_comment = comment::ActiveModel {
            warning_id: sea_orm::ActiveValue::Set(warning_id),
            user_id: sea_orm::ActiveValue::Set(user_id),
            content: sea_orm::ActiveValue::Set(content.to_string()),
            is_verified_victim: sea_orm::ActiveValue::Set(is_verified_victim),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = new_comment.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn list_by_warning(
        &self,
        warning_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<CommentModel>, u64)> {
        let paginator = Comment::find()
            .filter(comment::Column::WarningId.eq(warning_id))
            .order_by_desc(comment::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let comments = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((comments, total))
    }

    pub async fn update(
        &self,
        id: i32,
        actor: &UserModel,
        content: &str,
    ) -> AppResult<CommentModel> {
        let existing = self.get_by_id(id).await?;
        authorize(&existing, actor)?;

        let now = chrono::Utc::now().naive_utc();
        let mut active: comment::ActiveModel = existing.into();
        active.content = sea_orm::ActiveValue::Set(content.to_string());
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32, actor: &UserModel) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        authorize(&existing, actor)?;

        Comment::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<CommentModel> {
        Comment::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

/// The author may edit their own comment; admins and moderators may edit
/// anyone's.
fn authorize(comment: &CommentModel, actor: &UserModel) -> AppResult<()> {
    if comment.user_id == actor.id || actor.role.can_moderate() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user(id: i32, role: UserRole) -> UserModel {
        UserModel {
            id,
            username: format!("user{id}"),
            email: None,
            phone: None,
            password_hash: String::new(),
            role,
            full_name: None,
            avatar_url: None,
            zalo_contact: None,
            is_active: true,
            is_verified: false,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
            last_login: None,
        }
    }

    fn comment_by(user_id: i32) -> CommentModel {
        CommentModel {
            id: 1,
            warning_id: 1,
            user_id,
            content: "me too".to_string(),
            is_verified_victim: false,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn author_may_edit() {
        assert!(authorize(&comment_by(5), &user(5, UserRole::User)).is_ok());
    }

    #[test]
    fn stranger_may_not_edit() {
        assert!(authorize(&comment_by(5), &user(6, UserRole::User)).is_err());
    }

    #[test]
    fn moderator_may_edit_any() {
        assert!(authorize(&comment_by(5), &user(6, UserRole::Moderator)).is_ok());
        assert!(authorize(&comment_by(5), &user(7, UserRole::Admin)).is_ok());
    }
}
