use crate::{
    error::{AppError, AppResult},
    models::{report, EvidenceImages, Report, ReportModel, ReportType, ScamCategory, WarningStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct ReportService {
    db: DatabaseConnection,
}

pub struct NewReport {
    pub report_type: ReportType,
    pub scammer_name: Option<String>,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub facebook_link: Option<String>,
    pub website_url: Option<String>,
    pub website_category: Option<String>,
    pub content: String,
    pub evidence_images: Vec<String>,
    pub category: ScamCategory,
    pub reporter_id: Option<i32>,
    pub reporter_name: String,
    pub reporter_zalo: String,
    pub reporter_email: String,
    pub agree_terms: bool,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Public intake. The mandatory fields depend on the report type: a scam
    /// report needs a name or a bank account, a website report needs the
    /// URL, both need accepted terms.
    pub async fn create(&self, input: NewReport) -> AppResult<ReportModel> {
        match input.report_type {
            ReportType::Scam => {
                if input.scammer_name.is_none() && input.bank_account.is_none() {
                    return Err(AppError::Validation(
                        "Scammer name or bank account is required".to_string(),
                    ));
                }
            }
            ReportType::Website => {
                if input.website_url.is_none() {
                    return Err(AppError::Validation(
                        "Website URL is required".to_string(),
                    ));
                }
            }
        }

        if !input.agree_terms {
            return Err(AppError::Validation(
                "You must agree to the terms".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let model = report::ActiveModel {
            report_type: sea_orm::ActiveValue::Set(input.report_type),
            scammer_name: sea_orm::ActiveValue::Set(input.scammer_name),
            bank_account: sea_orm::ActiveValue::Set(input.bank_account),
            bank_name: sea_orm::ActiveValue::Set(input.bank_name),
            facebook_link: sea_orm::ActiveValue::Set(input.facebook_link),
            website_url: sea_orm::ActiveValue::Set(input.website_url),
            website_category: sea_orm::ActiveValue::Set(input.website_category),
            content: sea_orm::ActiveValue::Set(input.content),
            evidence_images: sea_orm::ActiveValue::Set(EvidenceImages(input.evidence_images)),
            category: sea_orm::ActiveValue::Set(input.category),
            status: sea_orm::ActiveValue::Set(WarningStatus::Pending),
            reporter_id: sea_orm::ActiveValue::Set(input.reporter_id),
            reporter_name: sea_orm::ActiveValue::Set(input.reporter_name),
            reporter_zalo: sea_orm::ActiveValue::Set(input.reporter_zalo),
            reporter_email: sea_orm::ActiveValue::Set(input.reporter_email),
            agree_terms: sea_orm::ActiveValue::Set(input.agree_terms),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn list(
        &self,
        report_type: Option<ReportType>,
        status: Option<WarningStatus>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ReportModel>, u64)> {
        let mut query = Report::find();

        if let Some(report_type) = report_type {
            query = query.filter(report::Column::ReportType.eq(report_type));
        }
        if let Some(status) = status {
            query = query.filter(report::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(report::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let reports = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((reports, total))
    }

    /// Review a report: any status change stamps the reviewer and time.
    pub async fn update_status(
        &self,
        report_id: i32,
        reviewer_id: i32,
        status: WarningStatus,
    ) -> AppResult<ReportModel> {
        let existing = Report::find_by_id(report_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now().naive_utc();
        let mut active: report::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(status);
        active.reviewer_id = sea_orm::ActiveValue::Set(Some(reviewer_id));
        active.reviewed_at = sea_orm::ActiveValue::Set(Some(now));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, report_id: i32) -> AppResult<()> {
        Report::find_by_id(report_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Report::delete_by_id(report_id).exec(&self.db).await?;
        Ok(())
    }
}
