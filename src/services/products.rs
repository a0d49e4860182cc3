use crate::{
    entities::{
        product::{self, Entity as ProductEntity, Model as ProductModel},
        variant, Variant, VariantModel,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{FieldKind, FieldSpec, RequestSchema},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<ProductModel>, ServiceError> {
        let mut select = ProductEntity::find().order_by_asc(product::Column::Id);
        if let Some(category) = query.category.as_deref() {
            select = select.filter(product::Column::Category.eq(category));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(product::Column::Name.contains(term));
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ProductModel, ServiceError> {
        find_by_id::<ProductEntity>(&self.db, id, "Product").await
    }

    /// Product together with its variants, ordered by product code.
    #[instrument(skip(self))]
    pub async fn get_with_variants(&self, id: i32) -> Result<ProductWithVariants, ServiceError> {
        let product = self.get(id).await?;
        let variants = product
            .find_related(Variant)
            .order_by_asc(variant::Column::ProductCode)
            .all(&*self.db)
            .await?;
        Ok(ProductWithVariants { product, variants })
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateProductInput) -> Result<ProductModel, ServiceError> {
        let model = product::ActiveModel {
            category: Set(input.category),
            name: Set(input.name),
            main_image: Set(input.main_image),
            no_variants: Set(0),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, "product created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        let mut model: product::ActiveModel = self.get(id).await?.into();

        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(main_image) = input.main_image {
            model.main_image = Set(Some(main_image));
        }

        Ok(model.update(&*self.db).await?)
    }

    /// Deletes a product; its variants go with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        info!(id, "product deleted");
        Ok(DeleteResponse::new(id))
    }
}

#[derive(Debug, Serialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: ProductModel,
    pub variants: Vec<VariantModel>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 512))]
    pub main_image: Option<String>,
}

impl RequestSchema for CreateProductInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("category", FieldKind::NonEmptyString),
        FieldSpec::required("name", FieldKind::NonEmptyString),
        FieldSpec::optional("main_image", FieldKind::String),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub main_image: Option<String>,
}

impl RequestSchema for UpdateProductInput {
    const FIELDS: &'static [FieldSpec] = CreateProductInput::FIELDS;
    const PARTIAL: bool = true;
}
