use crate::{
    entities::sales_rep::{self, Entity as SalesRepEntity, Model as SalesRepModel},
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{FieldKind, FieldSpec, RequestSchema},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Clone)]
pub struct SalesRepService {
    db: Arc<DatabaseConnection>,
}

impl SalesRepService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<SalesRepModel>, ServiceError> {
        let mut select = SalesRepEntity::find().order_by_asc(sales_rep::Column::Id);
        if let Some(active) = query.is_active {
            select = select.filter(sales_rep::Column::IsActive.eq(active));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(
                Condition::any()
                    .add(sales_rep::Column::EmpCode.contains(term))
                    .add(sales_rep::Column::SalesArea.contains(term))
                    .add(sales_rep::Column::Location.contains(term)),
            );
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<SalesRepModel, ServiceError> {
        find_by_id::<SalesRepEntity>(&self.db, id, "Sales rep").await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateStaffInput) -> Result<SalesRepModel, ServiceError> {
        let model = sales_rep::ActiveModel {
            emp_code: Set(input.emp_code),
            sales_area: Set(input.sales_area),
            location: Set(input.location),
            customer_count: Set(input.customer_count.unwrap_or(0)),
            is_active: Set(input.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, "sales rep created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateStaffInput,
    ) -> Result<SalesRepModel, ServiceError> {
        let mut model: sales_rep::ActiveModel = self.get(id).await?.into();

        if let Some(emp_code) = input.emp_code {
            model.emp_code = Set(Some(emp_code));
        }
        if let Some(sales_area) = input.sales_area {
            model.sales_area = Set(Some(sales_area));
        }
        if let Some(location) = input.location {
            model.location = Set(Some(location));
        }
        if let Some(count) = input.customer_count {
            model.customer_count = Set(count);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        Ok(DeleteResponse::new(id))
    }
}

/// Payload shared by sales reps and accountants.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffInput {
    #[validate(length(min = 1, max = 20))]
    pub emp_code: Option<String>,
    #[validate(length(max = 100))]
    pub sales_area: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub customer_count: Option<i32>,
    pub is_active: Option<bool>,
}

impl RequestSchema for CreateStaffInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("emp_code", FieldKind::NonEmptyString),
        FieldSpec::optional("sales_area", FieldKind::String),
        FieldSpec::optional("location", FieldKind::String),
        FieldSpec::optional("customer_count", FieldKind::Integer),
        FieldSpec::optional("is_active", FieldKind::Bool),
    ];
}

pub type UpdateStaffInput = CreateStaffInput;
