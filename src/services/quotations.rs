use crate::{
    entities::{
        quotation::{self, Entity as QuotationEntity, Model as QuotationModel, QuotationStatus},
        quotation_item, QuotationItem, QuotationItemModel,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{non_negative_decimal, FieldKind, FieldSpec, RequestSchema},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Quotation totals derived from its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationTotals {
    pub no_items: i32,
    pub sub_total: Decimal,
    pub net_total: Decimal,
    /// `item_qty * unit_price` per line, in input order
    pub line_totals: Vec<Decimal>,
}

/// `sub_total` is the sum of line totals; `net_total` subtracts the
/// discount, which may not exceed `sub_total`.
pub fn compute_totals(
    items: &[QuotationItemInput],
    discount: Decimal,
) -> Result<QuotationTotals, ServiceError> {
    let out_of_range =
        |i: usize| ServiceError::invalid_field(format!("items[{}].unit_price", i), "amount out of range");

    let mut line_totals = Vec::with_capacity(items.len());
    let mut sub_total = Decimal::ZERO;
    for (i, item) in items.iter().enumerate() {
        let line_total = Decimal::from(item.item_qty)
            .checked_mul(item.unit_price)
            .ok_or_else(|| out_of_range(i))?;
        sub_total = sub_total
            .checked_add(line_total)
            .ok_or_else(|| out_of_range(i))?;
        line_totals.push(line_total);
    }
    let no_items = i32::try_from(items.len())
        .map_err(|_| ServiceError::invalid_field("items", "too many items"))?;

    if discount > sub_total {
        return Err(ServiceError::invalid_field(
            "discount",
            "must not exceed the quotation sub total",
        ));
    }

    Ok(QuotationTotals {
        no_items,
        sub_total,
        net_total: sub_total - discount,
        line_totals,
    })
}

#[derive(Clone)]
pub struct QuotationService {
    db: Arc<DatabaseConnection>,
}

impl QuotationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<QuotationModel>, ServiceError> {
        let mut select = QuotationEntity::find().order_by_desc(quotation::Column::QuotationDate);
        if let Some(customer_id) = query.customer_id {
            select = select.filter(quotation::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = query.status.as_deref() {
            select = select.filter(quotation::Column::Status.eq(parse_status(status)?));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(quotation::Column::QuotationId.contains(term));
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<QuotationModel, ServiceError> {
        find_by_id::<QuotationEntity>(&self.db, id, "Quotation").await
    }

    pub(crate) async fn find_by_code<C: ConnectionTrait>(
        conn: &C,
        quotation_id: &str,
    ) -> Result<QuotationModel, ServiceError> {
        QuotationEntity::find()
            .filter(quotation::Column::QuotationId.eq(quotation_id))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Quotation", quotation_id))
    }

    /// Quotation with its line items.
    #[instrument(skip(self))]
    pub async fn get_with_items(&self, id: i32) -> Result<QuotationWithItems, ServiceError> {
        let quotation = self.get(id).await?;
        let items = quotation
            .find_related(QuotationItem)
            .order_by_asc(quotation_item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(QuotationWithItems { quotation, items })
    }

    /// Inserts the quotation and all of its items atomically.
    #[instrument(skip(self, input), fields(quotation_id = %input.quotation_id))]
    pub async fn create(
        &self,
        input: CreateQuotationInput,
    ) -> Result<QuotationWithItems, ServiceError> {
        let discount = input.discount.unwrap_or(Decimal::ZERO);
        let totals = compute_totals(&input.items, discount)?;

        let txn = self.db.begin().await?;
        let quotation = quotation::ActiveModel {
            quotation_id: Set(input.quotation_id.clone()),
            quotation_date: Set(input
                .quotation_date
                .unwrap_or_else(|| Utc::now().date_naive())),
            due_date: Set(input.due_date),
            customer_id: Set(input.customer_id),
            sales_rep_id: Set(input.sales_rep_id),
            no_items: Set(totals.no_items),
            sub_total: Set(totals.sub_total),
            discount: Set(discount),
            net_total: Set(totals.net_total),
            payment_term: Set(input.payment_term),
            company: Set(input.company),
            status: Set(QuotationStatus::Draft),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for (item, line_total) in input.items.into_iter().zip(totals.line_totals) {
            let saved = quotation_item::ActiveModel {
                quotation_id: Set(input.quotation_id.clone()),
                item_code: Set(item.item_code),
                description: Set(item.description),
                item_qty: Set(item.item_qty),
                unit_price: Set(item.unit_price),
                total_amount: Set(line_total),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(saved);
        }
        txn.commit().await?;

        info!(id = quotation.id, no_items = quotation.no_items, "quotation created");
        Ok(QuotationWithItems { quotation, items })
    }

    /// Updates header fields; a new discount recomputes `net_total`.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateQuotationInput,
    ) -> Result<QuotationModel, ServiceError> {
        let existing = self.get(id).await?;
        let sub_total = existing.sub_total;
        let mut model: quotation::ActiveModel = existing.into();

        if let Some(date) = input.quotation_date {
            model.quotation_date = Set(date);
        }
        if let Some(due_date) = input.due_date {
            model.due_date = Set(Some(due_date));
        }
        if let Some(customer_id) = input.customer_id {
            model.customer_id = Set(Some(customer_id));
        }
        if let Some(sales_rep_id) = input.sales_rep_id {
            model.sales_rep_id = Set(Some(sales_rep_id));
        }
        if let Some(discount) = input.discount {
            if discount > sub_total {
                return Err(ServiceError::invalid_field(
                    "discount",
                    "must not exceed the quotation sub total",
                ));
            }
            model.discount = Set(discount);
            model.net_total = Set(sub_total - discount);
        }
        if let Some(payment_term) = input.payment_term {
            model.payment_term = Set(Some(payment_term));
        }
        if let Some(company) = input.company {
            model.company = Set(Some(company));
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        status: QuotationStatus,
    ) -> Result<QuotationModel, ServiceError> {
        let existing = self.get(id).await?;
        if !existing.status.can_transition_to(status) {
            return Err(ServiceError::invalid_field(
                "status",
                format!(
                    "cannot move from {} to {}",
                    existing.status.as_str(),
                    status.as_str()
                ),
            ));
        }

        let mut model: quotation::ActiveModel = existing.into();
        model.status = Set(status);
        let updated = model.update(&*self.db).await?;
        info!(id, status = status.as_str(), "quotation status changed");
        Ok(updated)
    }

    /// Deletes a quotation; its items go with it and invoices keep a
    /// cleared reference.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        info!(id, "quotation deleted");
        Ok(DeleteResponse::new(id))
    }
}

pub fn parse_status(raw: &str) -> Result<QuotationStatus, ServiceError> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| ServiceError::invalid_field("status", format!("unknown status '{}'", raw)))
}

#[derive(Debug, Serialize)]
pub struct QuotationWithItems {
    #[serde(flatten)]
    pub quotation: QuotationModel,
    pub items: Vec<QuotationItemModel>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuotationItemInput {
    #[validate(length(min = 1, max = 64))]
    pub item_code: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1_000_000))]
    pub item_qty: i32,
    #[validate(custom = "non_negative_decimal")]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuotationInput {
    #[validate(length(min = 1, max = 32))]
    pub quotation_id: String,
    pub quotation_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub customer_id: Option<i32>,
    pub sales_rep_id: Option<i32>,
    #[validate(custom = "non_negative_decimal")]
    pub discount: Option<Decimal>,
    #[validate(length(max = 50))]
    pub payment_term: Option<String>,
    #[validate(length(max = 100))]
    pub company: Option<String>,
    #[validate]
    pub items: Vec<QuotationItemInput>,
}

impl RequestSchema for CreateQuotationInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("quotation_id", FieldKind::NonEmptyString),
        FieldSpec::optional("quotation_date", FieldKind::Date),
        FieldSpec::optional("due_date", FieldKind::Date),
        FieldSpec::optional("customer_id", FieldKind::Integer),
        FieldSpec::optional("sales_rep_id", FieldKind::Integer),
        FieldSpec::optional("discount", FieldKind::Number),
        FieldSpec::optional("payment_term", FieldKind::String),
        FieldSpec::optional("company", FieldKind::String),
        FieldSpec::required("items", FieldKind::NonEmptyArray),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuotationInput {
    pub quotation_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub customer_id: Option<i32>,
    pub sales_rep_id: Option<i32>,
    #[validate(custom = "non_negative_decimal")]
    pub discount: Option<Decimal>,
    #[validate(length(max = 50))]
    pub payment_term: Option<String>,
    #[validate(length(max = 100))]
    pub company: Option<String>,
}

impl RequestSchema for UpdateQuotationInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("quotation_date", FieldKind::Date),
        FieldSpec::optional("due_date", FieldKind::Date),
        FieldSpec::optional("customer_id", FieldKind::Integer),
        FieldSpec::optional("sales_rep_id", FieldKind::Integer),
        FieldSpec::optional("discount", FieldKind::Number),
        FieldSpec::optional("payment_term", FieldKind::String),
        FieldSpec::optional("company", FieldKind::String),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuotationStatusInput {
    pub status: String,
}

impl RequestSchema for UpdateQuotationStatusInput {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("status", FieldKind::NonEmptyString)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: i32, price: Decimal) -> QuotationItemInput {
        QuotationItemInput {
            item_code: "LIP-001".into(),
            description: None,
            item_qty: qty,
            unit_price: price,
        }
    }

    #[test]
    fn totals_sum_line_items_and_apply_discount() {
        let totals = compute_totals(&[item(2, dec!(12.50)), item(1, dec!(5.25))], dec!(3)).unwrap();
        assert_eq!(totals.no_items, 2);
        assert_eq!(totals.line_totals, vec![dec!(25.00), dec!(5.25)]);
        assert_eq!(totals.sub_total, dec!(30.25));
        assert_eq!(totals.net_total, dec!(27.25));
    }

    #[test]
    fn discount_above_sub_total_is_rejected() {
        let err = compute_totals(&[item(1, dec!(10))], dec!(11)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn overflowing_amounts_are_rejected_per_item() {
        let err = compute_totals(&[item(1, dec!(1)), item(1000, Decimal::MAX)], Decimal::ZERO)
            .unwrap_err();
        match err {
            ServiceError::ValidationError(violations) => {
                assert_eq!(violations[0].field, "items[1].unit_price");
                assert_eq!(violations[0].message, "amount out of range");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = compute_totals(&[item(1, Decimal::MAX), item(1, Decimal::MAX)], Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(ref v) if v[0].field == "items[1].unit_price"));
    }

    #[test]
    fn status_lifecycle() {
        assert!(QuotationStatus::Draft.can_transition_to(QuotationStatus::Sent));
        assert!(QuotationStatus::Accepted.can_transition_to(QuotationStatus::Invoiced));
        assert!(!QuotationStatus::Invoiced.can_transition_to(QuotationStatus::Draft));
        assert!(!QuotationStatus::Rejected.can_transition_to(QuotationStatus::Accepted));
        assert_eq!(parse_status("SENT").unwrap(), QuotationStatus::Sent);
        assert!(parse_status("archived").is_err());
    }
}
