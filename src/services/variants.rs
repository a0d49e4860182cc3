use crate::{
    entities::{
        product,
        variant::{self, Entity as VariantEntity, Model as VariantModel},
        Product,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{non_negative_decimal, FieldKind, FieldSpec, RequestSchema},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Variants of a product. Every insert, delete or move between products
/// adjusts `products.no_variants` in the same transaction.
#[derive(Clone)]
pub struct VariantService {
    db: Arc<DatabaseConnection>,
}

async fn adjust_variant_count<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    delta: i32,
) -> Result<(), ServiceError> {
    product::Entity::update_many()
        .col_expr(
            product::Column::NoVariants,
            Expr::col(product::Column::NoVariants).add(delta),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .exec(conn)
        .await?;
    Ok(())
}

fn check_dates(mfd: Option<NaiveDate>, exp: Option<NaiveDate>) -> Result<(), ServiceError> {
    match (mfd, exp) {
        (Some(mfd), Some(exp)) if exp < mfd => Err(ServiceError::invalid_field(
            "exp_date",
            "must not be before mfd_date",
        )),
        _ => Ok(()),
    }
}

impl VariantService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<VariantModel>, ServiceError> {
        let mut select = VariantEntity::find().order_by_asc(variant::Column::Id);
        if let Some(product_id) = query.product_id {
            select = select.filter(variant::Column::ProductId.eq(product_id));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(variant::Column::ProductCode.contains(term));
        }
        fetch_page(&self.db, select, query).await
    }

    /// Variants whose stock is at or below their reorder level.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<VariantModel>, ServiceError> {
        Ok(VariantEntity::find()
            .filter(Expr::col(variant::Column::Quantity).lte(Expr::col(variant::Column::MinQty)))
            .order_by_asc(variant::Column::Quantity)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<VariantModel, ServiceError> {
        find_by_id::<VariantEntity>(&self.db, id, "Variant").await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<VariantModel>, ServiceError> {
        Ok(VariantEntity::find()
            .filter(variant::Column::ProductCode.eq(code))
            .one(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input), fields(product_code = %input.product_code))]
    pub async fn create(&self, input: CreateVariantInput) -> Result<VariantModel, ServiceError> {
        check_dates(input.mfd_date, input.exp_date)?;

        let txn = self.db.begin().await?;
        let model = variant::ActiveModel {
            product_id: Set(input.product_id),
            product_code: Set(input.product_code),
            color: Set(input.color),
            price: Set(input.price),
            image: Set(input.image),
            quantity: Set(input.quantity.unwrap_or(0)),
            min_qty: Set(input.min_qty.unwrap_or(0)),
            mfd_date: Set(input.mfd_date),
            exp_date: Set(input.exp_date),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        adjust_variant_count(&txn, model.product_id, 1).await?;
        txn.commit().await?;

        info!(id = model.id, product_id = model.product_id, "variant created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateVariantInput,
    ) -> Result<VariantModel, ServiceError> {
        let existing = self.get(id).await?;
        check_dates(
            input.mfd_date.or(existing.mfd_date),
            input.exp_date.or(existing.exp_date),
        )?;

        let previous_product = existing.product_id;
        let mut model: variant::ActiveModel = existing.into();

        if let Some(product_id) = input.product_id {
            model.product_id = Set(product_id);
        }
        if let Some(code) = input.product_code {
            model.product_code = Set(code);
        }
        if let Some(color) = input.color {
            model.color = Set(Some(color));
        }
        if let Some(price) = input.price {
            model.price = Set(price);
        }
        if let Some(image) = input.image {
            model.image = Set(Some(image));
        }
        if let Some(quantity) = input.quantity {
            model.quantity = Set(quantity);
        }
        if let Some(min_qty) = input.min_qty {
            model.min_qty = Set(min_qty);
        }
        if let Some(mfd) = input.mfd_date {
            model.mfd_date = Set(Some(mfd));
        }
        if let Some(exp) = input.exp_date {
            model.exp_date = Set(Some(exp));
        }

        let txn = self.db.begin().await?;
        let updated = model.update(&txn).await?;
        if updated.product_id != previous_product {
            adjust_variant_count(&txn, previous_product, -1).await?;
            adjust_variant_count(&txn, updated.product_id, 1).await?;
        }
        txn.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        let product_id = model.product_id;

        let txn = self.db.begin().await?;
        model.delete(&txn).await?;
        adjust_variant_count(&txn, product_id, -1).await?;
        txn.commit().await?;

        info!(id, product_id, "variant deleted");
        Ok(DeleteResponse::new(id))
    }

    /// Parent product of a variant.
    pub async fn product_of(&self, id: i32) -> Result<product::Model, ServiceError> {
        let model = self.get(id).await?;
        model
            .find_related(Product)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", model.product_id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVariantInput {
    pub product_id: i32,
    #[validate(length(min = 1, max = 64))]
    pub product_code: String,
    #[validate(length(max = 64))]
    pub color: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    pub price: Decimal,
    #[validate(length(max = 512))]
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub min_qty: Option<i32>,
    pub mfd_date: Option<NaiveDate>,
    pub exp_date: Option<NaiveDate>,
}

impl RequestSchema for CreateVariantInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("product_id", FieldKind::Integer),
        FieldSpec::required("product_code", FieldKind::NonEmptyString),
        FieldSpec::optional("color", FieldKind::String),
        FieldSpec::required("price", FieldKind::Number),
        FieldSpec::optional("image", FieldKind::String),
        FieldSpec::optional("quantity", FieldKind::Integer),
        FieldSpec::optional("min_qty", FieldKind::Integer),
        FieldSpec::optional("mfd_date", FieldKind::Date),
        FieldSpec::optional("exp_date", FieldKind::Date),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVariantInput {
    pub product_id: Option<i32>,
    #[validate(length(min = 1, max = 64))]
    pub product_code: Option<String>,
    #[validate(length(max = 64))]
    pub color: Option<String>,
    #[validate(custom = "non_negative_decimal")]
    pub price: Option<Decimal>,
    #[validate(length(max = 512))]
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub min_qty: Option<i32>,
    pub mfd_date: Option<NaiveDate>,
    pub exp_date: Option<NaiveDate>,
}

impl RequestSchema for UpdateVariantInput {
    const FIELDS: &'static [FieldSpec] = CreateVariantInput::FIELDS;
    const PARTIAL: bool = true;
}
