use sea_orm_migration::prelude::*;

use super::m20240301_000005_create_customers_table::Customers;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000008_create_quotations_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Quotations::Table)
            .if_not_exists()
            .col(&mut id_column(Quotations::Id))
            .col(
                ColumnDef::new(Quotations::QuotationId)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Quotations::QuotationDate).date().not_null())
            .col(ColumnDef::new(Quotations::DueDate).date().null())
            .col(ColumnDef::new(Quotations::CustomerId).integer().null())
            .col(ColumnDef::new(Quotations::SalesRepId).integer().null())
            .col(
                ColumnDef::new(Quotations::NoItems)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Quotations::SubTotal)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Quotations::Discount)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Quotations::NetTotal)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .col(ColumnDef::new(Quotations::PaymentTerm).string_len(64).null())
            .col(ColumnDef::new(Quotations::Company).string_len(128).null())
            .col(
                ColumnDef::new(Quotations::Status)
                    .string_len(20)
                    .not_null()
                    .default("draft"),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_quotations_customer_id")
                    .from(Quotations::Table, Quotations::CustomerId)
                    .to(Customers::Table, Customers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Quotations {
    Table,
    Id,
    QuotationId,
    QuotationDate,
    DueDate,
    CustomerId,
    SalesRepId,
    NoItems,
    SubTotal,
    Discount,
    NetTotal,
    PaymentTerm,
    Company,
    Status,
}
