use crate::{
    entities::customer::{self, Entity as CustomerEntity, Model as CustomerModel},
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

/// Customer records. Each customer belongs to a user through `user_code`
/// and is removed together with that user.
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<CustomerModel>, ServiceError> {
        let mut select = CustomerEntity::find().order_by_asc(customer::Column::Id);
        if let Some(term) = query.search_term() {
            select = select.filter(
                Condition::any()
                    .add(customer::Column::FirstName.contains(term))
                    .add(customer::Column::LastName.contains(term))
                    .add(customer::Column::Email.contains(term))
                    .add(customer::Column::UserCode.contains(term)),
            );
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CustomerModel, ServiceError> {
        find_by_id::<CustomerEntity>(&self.db, id, "Customer").await
    }

    #[instrument(skip(self, input), fields(user_code = %input.user_code))]
    pub async fn create(&self, input: CreateCustomerInput) -> Result<CustomerModel, ServiceError> {
        let model = customer::ActiveModel {
            user_code: Set(input.user_code),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            contact_1: Set(input.contact_1),
            contact_2: Set(input.contact_2),
            address_line_1: Set(input.address_line_1),
            address_line_2: Set(input.address_line_2),
            city: Set(input.city),
            postal_code: Set(input.postal_code),
            note: Set(input.note),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, "customer created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateCustomerInput,
    ) -> Result<CustomerModel, ServiceError> {
        let mut model: customer::ActiveModel = self.get(id).await?.into();

        if let Some(user_code) = input.user_code {
            model.user_code = Set(user_code);
        }
        if let Some(first_name) = input.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = input.email {
            model.email = Set(Some(email));
        }
        if let Some(contact) = input.contact_1 {
            model.contact_1 = Set(Some(contact));
        }
        if let Some(contact) = input.contact_2 {
            model.contact_2 = Set(Some(contact));
        }
        if let Some(line) = input.address_line_1 {
            model.address_line_1 = Set(Some(line));
        }
        if let Some(line) = input.address_line_2 {
            model.address_line_2 = Set(Some(line));
        }
        if let Some(city) = input.city {
            model.city = Set(Some(city));
        }
        if let Some(postal_code) = input.postal_code {
            model.postal_code = Set(Some(postal_code));
        }
        if let Some(note) = input.note {
            model.note = Set(Some(note));
        }

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        info!(id, "customer deleted");
        Ok(DeleteResponse::new(id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 20))]
    pub user_code: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub contact_1: Option<String>,
    #[validate(length(max = 20))]
    pub contact_2: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    pub note: Option<String>,
}

impl RequestSchema for CreateCustomerInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("user_code", FieldKind::NonEmptyString),
        FieldSpec::required("first_name", FieldKind::NonEmptyString),
        FieldSpec::required("last_name", FieldKind::NonEmptyString),
        FieldSpec::optional("email", FieldKind::String),
        FieldSpec::optional("contact_1", FieldKind::String),
        FieldSpec::optional("contact_2", FieldKind::String),
        FieldSpec::optional("address_line_1", FieldKind::String),
        FieldSpec::optional("address_line_2", FieldKind::String),
        FieldSpec::optional("city", FieldKind::String),
        FieldSpec::optional("postal_code", FieldKind::String),
        FieldSpec::optional("note", FieldKind::String),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerInput {
    #[validate(length(min = 1, max = 20))]
    pub user_code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub contact_1: Option<String>,
    #[validate(length(max = 20))]
    pub contact_2: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    pub note: Option<String>,
}

impl RequestSchema for UpdateCustomerInput {
    const FIELDS: &'static [FieldSpec] = CreateCustomerInput::FIELDS;
    const PARTIAL: bool = true;
}
