use crate::{
    entities::{
        invoice::{self, Entity as InvoiceEntity, Model as InvoiceModel},
        quotation::{self, QuotationStatus},
        Quotation, QuotationModel,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, quotations::QuotationService, DeleteResponse, ListQuery, Page},
    validation::{FieldKind, FieldSpec, RequestSchema},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
}

impl InvoiceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<InvoiceModel>, ServiceError> {
        let mut select = InvoiceEntity::find().order_by_desc(invoice::Column::Id);
        if let Some(term) = query.search_term() {
            select = select.filter(invoice::Column::InvoiceNo.contains(term));
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<InvoiceWithQuotation, ServiceError> {
        let invoice = find_by_id::<InvoiceEntity>(&self.db, id, "Invoice").await?;
        let quotation = match invoice.quotation_id {
            Some(_) => invoice.find_related(Quotation).one(&*self.db).await?,
            None => None,
        };
        Ok(InvoiceWithQuotation { invoice, quotation })
    }

    /// Issues an invoice. When it references a quotation, that quotation
    /// moves to `invoiced` in the same transaction.
    #[instrument(skip(self, input), fields(invoice_no = %input.invoice_no))]
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<InvoiceWithQuotation, ServiceError> {
        let txn = self.db.begin().await?;

        let quotation = match input.quotation_id.as_deref() {
            Some(code) => {
                let existing = QuotationService::find_by_code(&txn, code).await?;
                if existing.status == QuotationStatus::Invoiced {
                    return Err(ServiceError::ConstraintError(format!(
                        "Quotation {} is already invoiced",
                        code
                    )));
                }
                if !existing.status.can_transition_to(QuotationStatus::Invoiced) {
                    return Err(ServiceError::invalid_field(
                        "quotation_id",
                        format!("quotation is {}", existing.status.as_str()),
                    ));
                }
                let mut active: quotation::ActiveModel = existing.into();
                active.status = Set(QuotationStatus::Invoiced);
                Some(active.update(&txn).await?)
            }
            None => None,
        };

        let invoice = invoice::ActiveModel {
            invoice_no: Set(input.invoice_no),
            quotation_id: Set(input.quotation_id),
            cr_by: Set(input.cr_by),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(id = invoice.id, "invoice created");
        Ok(InvoiceWithQuotation { invoice, quotation })
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateInvoiceInput,
    ) -> Result<InvoiceModel, ServiceError> {
        let existing = find_by_id::<InvoiceEntity>(&self.db, id, "Invoice").await?;
        let mut model: invoice::ActiveModel = existing.into();

        if let Some(invoice_no) = input.invoice_no {
            model.invoice_no = Set(invoice_no);
        }
        if let Some(cr_by) = input.cr_by {
            model.cr_by = Set(Some(cr_by));
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = find_by_id::<InvoiceEntity>(&self.db, id, "Invoice").await?;
        model.delete(&*self.db).await?;
        info!(id, "invoice deleted");
        Ok(DeleteResponse::new(id))
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceWithQuotation {
    #[serde(flatten)]
    pub invoice: InvoiceModel,
    pub quotation: Option<QuotationModel>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceInput {
    #[validate(length(min = 1, max = 32))]
    pub invoice_no: String,
    #[validate(length(min = 1, max = 32))]
    pub quotation_id: Option<String>,
    #[validate(length(max = 50))]
    pub cr_by: Option<String>,
}

impl RequestSchema for CreateInvoiceInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("invoice_no", FieldKind::NonEmptyString),
        FieldSpec::optional("quotation_id", FieldKind::NonEmptyString),
        FieldSpec::optional("cr_by", FieldKind::String),
    ];
}

/// The quotation link is fixed once issued.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceInput {
    #[validate(length(min = 1, max = 32))]
    pub invoice_no: Option<String>,
    #[validate(length(max = 50))]
    pub cr_by: Option<String>,
}

impl RequestSchema for UpdateInvoiceInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("invoice_no", FieldKind::NonEmptyString),
        FieldSpec::optional("cr_by", FieldKind::String),
    ];
}
