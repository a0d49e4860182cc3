use crate::{
    entities::accountant::{self, Entity as AccountantEntity, Model as AccountantModel},
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

pub use super::sales_reps::{CreateStaffInput, UpdateStaffInput};

#[derive(Clone)]
pub struct AccountantService {
    db: Arc<DatabaseConnection>,
}

impl AccountantService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<AccountantModel>, ServiceError> {
        let mut select = AccountantEntity::find().order_by_asc(accountant::Column::Id);
        if let Some(active) = query.is_active {
            select = select.filter(accountant::Column::IsActive.eq(active));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(
                Condition::any()
                    .add(accountant::Column::EmpCode.contains(term))
                    .add(accountant::Column::SalesArea.contains(term))
                    .add(accountant::Column::Location.contains(term)),
            );
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<AccountantModel, ServiceError> {
        find_by_id::<AccountantEntity>(&self.db, id, "Accountant").await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateStaffInput) -> Result<AccountantModel, ServiceError> {
        let model = accountant::ActiveModel {
            emp_code: Set(input.emp_code),
            sales_area: Set(input.sales_area),
            location: Set(input.location),
            customer_count: Set(input.customer_count.unwrap_or(0)),
            is_active: Set(input.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, "accountant created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateStaffInput,
    ) -> Result<AccountantModel, ServiceError> {
        let mut model: accountant::ActiveModel = self.get(id).await?.into();

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
