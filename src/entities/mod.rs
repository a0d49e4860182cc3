//! Persistence models for the ERP schema.
//!
//! Every association is declared on the entity's `Relation` enum together
//! with its key pair and `on_delete` rule; the tables themselves are owned by
//! the `migrations` crate.

/// Stamps `createdAt` on insert and `updatedAt` on every save.
macro_rules! timestamped_behavior {
    () => {
        #[async_trait::async_trait]
        impl sea_orm::ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, sea_orm::DbErr>
            where
                C: sea_orm::ConnectionTrait,
            {
                let now = chrono::Utc::now();
                if insert {
                    self.created_at = sea_orm::ActiveValue::Set(now);
                }
                self.updated_at = sea_orm::ActiveValue::Set(now);
                Ok(self)
            }
        }
    };
}

pub mod accountant;
pub mod customer;
pub mod invoice;
pub mod order;
pub mod product;
pub mod quotation;
pub mod quotation_item;
pub mod sales_rep;
pub mod user;
pub mod user_type;
pub mod variant;

pub use accountant::{Entity as Accountant, Model as AccountantModel};
pub use customer::{Entity as Customer, Model as CustomerModel};
pub use invoice::{Entity as Invoice, Model as InvoiceModel};
pub use order::{Entity as Order, Model as OrderModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use quotation::{Entity as Quotation, Model as QuotationModel};
pub use quotation_item::{Entity as QuotationItem, Model as QuotationItemModel};
pub use sales_rep::{Entity as SalesRep, Model as SalesRepModel};
pub use user::{Entity as User, Model as UserModel};
pub use user_type::{Entity as UserType, Model as UserTypeModel};
pub use variant::{Entity as Variant, Model as VariantModel};
