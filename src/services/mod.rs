//! Business logic over the shared `DatabaseConnection`.
//!
//! One service per resource; handlers stay thin and delegate here.

use crate::{auth::AuthConfig, errors::ServiceError};
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, PrimaryKeyTrait, Select,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// User service resources
pub mod accountants;
pub mod customers;
pub mod sales_reps;
pub mod user_types;
pub mod users;

// Inventory service resources
pub mod products;
pub mod variants;

// Order service resources
pub mod invoices;
pub mod orders;
pub mod quotations;
pub mod reports;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
/// Highest page whose row offset still fits the database's signed 64-bit
/// OFFSET at any page size.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PER_PAGE;

/// Query string accepted by every list endpoint. Each resource reads the
/// filters that apply to it and ignores the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub product_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub user_type_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl ListQuery {
    /// One-based page number.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Non-blank search term, trimmed.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A page of rows plus the total row count of the filtered query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i32,
}

impl DeleteResponse {
    pub fn new(id: i32) -> Self {
        Self { deleted: true, id }
    }
}

pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    query: &ListQuery,
) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let page = query.page();
    let per_page = query.per_page();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        items,
        total,
        page,
        per_page,
    })
}

/// Loads a row by surrogate id or fails with `NotFound`.
pub(crate) async fn find_by_id<E>(
    db: &DatabaseConnection,
    id: i32,
    resource: &str,
) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found(resource, id))
}

/// Every service, sharing one connection pool.
#[derive(Clone)]
pub struct AppServices {
    pub user_types: Arc<user_types::UserTypeService>,
    pub users: Arc<users::UserService>,
    pub sales_reps: Arc<sales_reps::SalesRepService>,
    pub accountants: Arc<accountants::AccountantService>,
    pub customers: Arc<customers::CustomerService>,
    pub products: Arc<products::ProductService>,
    pub variants: Arc<variants::VariantService>,
    pub quotations: Arc<quotations::QuotationService>,
    pub invoices: Arc<invoices::InvoiceService>,
    pub orders: Arc<orders::OrderService>,
    pub reports: Arc<reports::ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, auth: AuthConfig) -> Self {
        Self {
            user_types: Arc::new(user_types::UserTypeService::new(db.clone())),
            users: Arc::new(users::UserService::new(db.clone(), auth)),
            sales_reps: Arc::new(sales_reps::SalesRepService::new(db.clone())),
            accountants: Arc::new(accountants::AccountantService::new(db.clone())),
            customers: Arc::new(customers::CustomerService::new(db.clone())),
            products: Arc::new(products::ProductService::new(db.clone())),
            variants: Arc::new(variants::VariantService::new(db.clone())),
            quotations: Arc::new(quotations::QuotationService::new(db.clone())),
            invoices: Arc::new(invoices::InvoiceService::new(db.clone())),
            orders: Arc::new(orders::OrderService::new(db.clone())),
            reports: Arc::new(reports::ReportService::new(db)),
        }
    }
}
