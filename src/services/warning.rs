use crate::{
    error::{AppError, AppResult},
    models::{warning, EvidenceImages, ScamCategory, UserModel, Warning, WarningModel, WarningStatus},
    search::{IndexEvent, IndexSync, WarningDocument},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement,
};

pub struct WarningService {
    db: DatabaseConnection,
    sync: IndexSync,
}

pub struct NewWarning {
    pub title: String,
    pub scammer_name: String,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub facebook_link: Option<String>,
    pub content: String,
    pub category: ScamCategory,
    pub evidence_images: Vec<String>,
    pub reporter_name: Option<String>,
    pub reporter_zalo: Option<String>,
    pub is_anonymous: bool,
    pub reporter_nickname: Option<String>,
}

impl WarningService {
    pub fn new(db: DatabaseConnection, sync: IndexSync) -> Self {
        Self { db, sync }
    }

    /// Submit a new warning. Always lands as pending with a duplicate count
    /// of 1; reporter contact details default to the submitting user's
    /// profile. Pending warnings are not pushed to the search index — the
    /// projection holds approved warnings only.
    pub async fn create(&self, reporter: &UserModel, input: NewWarning) -> AppResult<WarningModel> {
        let now = chrono::Utc::now().naive_utc();

        let reporter_name = input.reporter_name.or_else(|| reporter.full_name.clone());
        let reporter_zalo = input.reporter_zalo.or_else(|| reporter.zalo_contact.clone());

        let new_warning = warning::ActiveModel {
            title: sea_orm::ActiveValue::Set(input.title),
            scammer_name: sea_orm::ActiveValue::Set(input.scammer_name),
            bank_account: sea_orm::ActiveValue::Set(input.bank_account),
            bank_name: sea_orm::ActiveValue::Set(input.bank_name),
            facebook_link: sea_orm::ActiveValue::Set(input.facebook_link),
            content: sea_orm::ActiveValue::Set(input.content),
            category: sea_orm::ActiveValue::Set(input.category),
            evidence_images: sea_orm::ActiveValue::Set(EvidenceImages(input.evidence_images)),
            status: sea_orm::ActiveValue::Set(WarningStatus::Pending),
            view_count: sea_orm::ActiveValue::Set(0),
            search_count: sea_orm::ActiveValue::Set(0),
            warning_count: sea_orm::ActiveValue::Set(1),
            reporter_id: sea_orm::ActiveValue::Set(Some(reporter.id)),
            reporter_name: sea_orm::ActiveValue::Set(reporter_name),
            reporter_zalo: sea_orm::ActiveValue::Set(reporter_zalo),
            is_anonymous: sea_orm::ActiveValue::Set(input.is_anonymous),
            reporter_nickname: sea_orm::ActiveValue::Set(input.reporter_nickname),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = new_warning.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<WarningModel> {
        Warning::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Public fetch: only approved warnings exist as far as visitors are
    /// concerned. Bumps the view counter.
    pub async fn get_public(&self, id: i32) -> AppResult<WarningModel> {
        let mut found = self.get_by_id(id).await?;
        if found.status != WarningStatus::Approved {
            return Err(AppError::NotFound);
        }

        self.db
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                "UPDATE warnings SET view_count = view_count + 1 WHERE id = $1",
                [id.into()],
            ))
            .await?;
        found.view_count += 1;

        Ok(found)
    }

    pub async fn list_public(
        &self,
        category: Option<ScamCategory>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<WarningModel>, u64)> {
        let mut query = Warning::find().filter(warning::Column::Status.eq(WarningStatus::Approved));

        if let Some(category) = category {
            query = query.filter(warning::Column::Category.eq(category));
        }

        let paginator = query
            .order_by_desc(warning::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let warnings = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((warnings, total))
    }

    /// A reporter's own submissions, any status.
    pub async fn list_by_reporter(
        &self,
        reporter_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<WarningModel>, u64)> {
        let paginator = Warning::find()
            .filter(warning::Column::ReporterId.eq(reporter_id))
            .order_by_desc(warning::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let warnings = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((warnings, total))
    }

    /// Moderation queue: all statuses, optional filter.
    pub async fn list_admin(
        &self,
        status: Option<WarningStatus>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<WarningModel>, u64)> {
        let mut query = Warning::find();

        if let Some(status) = status {
            query = query.filter(warning::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(warning::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let warnings = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((warnings, total))
    }

    /// Review a pending warning. Reviewer and timestamp are stamped whenever
    /// a status is supplied; approval additionally stamps `approved_at` and
    /// recomputes the duplicate counter. The note, when present, overwrites
    /// any previous one.
    pub async fn review(
        &self,
        warning_id: i32,
        reviewer_id: i32,
        new_status: Option<WarningStatus>,
        note: Option<String>,
    ) -> AppResult<WarningModel> {
        let existing = self.get_by_id(warning_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: warning::ActiveModel = existing.clone().into();

        if let Some(status) = new_status {
            match status {
                WarningStatus::Approved | WarningStatus::Rejected => {}
                _ => {
                    return Err(AppError::Validation(
                        "Review status must be approved or rejected".to_string(),
                    ))
                }
            }
            if existing.status != WarningStatus::Pending {
                return Err(AppError::Validation(
                    "Only pending warnings can be reviewed".to_string(),
                ));
            }

            active.status = sea_orm::ActiveValue::Set(status);
            active.reviewer_id = sea_orm::ActiveValue::Set(Some(reviewer_id));
            active.reviewed_at = sea_orm::ActiveValue::Set(Some(now));

            if status == WarningStatus::Approved {
                active.approved_at = sea_orm::ActiveValue::Set(Some(now));

                let siblings = self
                    .approved_sibling_count(
                        &existing.scammer_name,
                        existing.bank_account.as_deref(),
                        existing.id,
                    )
                    .await?;
                active.warning_count = sea_orm::ActiveValue::Set(siblings as i32 + 1);
            }
        }

        if let Some(note) = note {
            active.review_note = sea_orm::ActiveValue::Set(Some(note));
        }

        active.updated_at = sea_orm::ActiveValue::Set(Some(now));
        let updated = active.update(&self.db).await?;

        // Propagate to the index after commit, best-effort. Approval makes
        // the document searchable; rejection removes any stale copy.
        match updated.status {
            WarningStatus::Approved => self
                .sync
                .enqueue(IndexEvent::WarningUpserted(WarningDocument::from(&updated))),
            WarningStatus::Rejected => {
                self.sync.enqueue(IndexEvent::WarningDeleted(updated.id))
            }
            _ => {}
        }

        Ok(updated)
    }

    /// Soft delete: the row is retained, only the status changes. The
    /// search-index document is removed best-effort.
    pub async fn soft_delete(&self, warning_id: i32) -> AppResult<()> {
        let existing = self.get_by_id(warning_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: warning::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(WarningStatus::Deleted);
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));
        active.update(&self.db).await?;

        self.sync.enqueue(IndexEvent::WarningDeleted(warning_id));
        Ok(())
    }

    /// Count other approved warnings naming the same scammer identity. A
    /// missing bank account never matches anything, so the count is zero —
    /// the identity is (name, account), not name alone.
    async fn approved_sibling_count(
        &self,
        scammer_name: &str,
        bank_account: Option<&str>,
        exclude_id: i32,
    ) -> AppResult<u64> {
        let Some(bank_account) = bank_account else {
            return Ok(0);
        };

        let count = Warning::find()
            .filter(warning::Column::Status.eq(WarningStatus::Approved))
            .filter(warning::Column::ScammerName.eq(scammer_name))
            .filter(warning::Column::BankAccount.eq(bank_account))
            .filter(warning::Column::Id.ne(exclude_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
