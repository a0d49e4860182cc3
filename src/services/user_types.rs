use crate::{
    entities::user_type::{self, Entity as UserTypeEntity, Model as UserTypeModel},
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{FieldKind, FieldSpec, RequestSchema},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Clone)]
pub struct UserTypeService {
    db: Arc<DatabaseConnection>,
}

impl UserTypeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<UserTypeModel>, ServiceError> {
        let mut select = UserTypeEntity::find().order_by_asc(user_type::Column::UserTypeId);
        if let Some(active) = query.is_active {
            select = select.filter(user_type::Column::IsActive.eq(active));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(user_type::Column::TypeName.contains(term));
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<UserTypeModel, ServiceError> {
        find_by_id::<UserTypeEntity>(&self.db, id, "User type").await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUserTypeInput) -> Result<UserTypeModel, ServiceError> {
        let model = user_type::ActiveModel {
            user_type_id: Set(input.user_type_id),
            type_name: Set(input.type_name),
            is_active: Set(input.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(user_type_id = model.user_type_id, "user type created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateUserTypeInput,
    ) -> Result<UserTypeModel, ServiceError> {
        let mut model: user_type::ActiveModel = self.get(id).await?.into();

        if let Some(user_type_id) = input.user_type_id {
            model.user_type_id = Set(user_type_id);
        }
        if let Some(type_name) = input.type_name {
            model.type_name = Set(type_name);
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
        info!(id, "user type deleted");
        Ok(DeleteResponse::new(id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserTypeInput {
    #[validate(range(min = 1))]
    pub user_type_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub type_name: String,
    pub is_active: Option<bool>,
}

impl RequestSchema for CreateUserTypeInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("user_type_id", FieldKind::Integer),
        FieldSpec::required("type_name", FieldKind::NonEmptyString),
        FieldSpec::optional("is_active", FieldKind::Bool),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserTypeInput {
    #[validate(range(min = 1))]
    pub user_type_id: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub type_name: Option<String>,
    pub is_active: Option<bool>,
}

impl RequestSchema for UpdateUserTypeInput {
    const FIELDS: &'static [FieldSpec] = CreateUserTypeInput::FIELDS;
    const PARTIAL: bool = true;
}
