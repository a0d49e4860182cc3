use sea_orm_migration::prelude::*;

use super::m20240301_000005_create_customers_table::Customers;
use super::m20240301_000007_create_variants_table::Variants;
use super::m20240301_000008_create_quotations_table::Quotations;
use super::m20240301_000009_create_quotation_items_table::QuotationItems;
use super::m20240301_000010_create_invoices_table::Invoices;
use super::m20240301_000011_create_orders_table::Orders;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240315_000012_add_lookup_indexes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_user_code")
                    .table(Customers::Table)
                    .col(Customers::UserCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variants_product_id")
                    .table(Variants::Table)
                    .col(Variants::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotations_status")
                    .table(Quotations::Table)
                    .col(Quotations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotation_items_quotation_id")
                    .table(QuotationItems::Table)
                    .col(QuotationItems::QuotationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_quotation_id")
                    .table(Invoices::Table)
                    .col(Invoices::QuotationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_customer_id")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_customer_id")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_invoices_quotation_id")
                    .table(Invoices::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_quotation_items_quotation_id")
                    .table(QuotationItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_quotations_status")
                    .table(Quotations::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_variants_product_id")
                    .table(Variants::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_customers_user_code")
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
