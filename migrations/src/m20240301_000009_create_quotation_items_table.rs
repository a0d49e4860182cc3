use sea_orm_migration::prelude::*;

use super::m20240301_000007_create_variants_table::Variants;
use super::m20240301_000008_create_quotations_table::Quotations;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000009_create_quotation_items_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(QuotationItems::Table)
            .if_not_exists()
            .col(&mut id_column(QuotationItems::Id))
            .col(
                ColumnDef::new(QuotationItems::QuotationId)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(QuotationItems::ItemCode)
                    .string_len(64)
                    .not_null(),
            )
            .col(
                ColumnDef::new(QuotationItems::Description)
                    .string_len(255)
                    .null(),
            )
            .col(ColumnDef::new(QuotationItems::ItemQty).integer().not_null())
            .col(
                ColumnDef::new(QuotationItems::UnitPrice)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .col(
                ColumnDef::new(QuotationItems::TotalAmount)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_quotation_items_quotation_id")
                    .from(QuotationItems::Table, QuotationItems::QuotationId)
                    .to(Quotations::Table, Quotations::QuotationId)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_quotation_items_item_code")
                    .from(QuotationItems::Table, QuotationItems::ItemCode)
                    .to(Variants::Table, Variants::ProductCode)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuotationItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum QuotationItems {
    Table,
    Id,
    QuotationId,
    ItemCode,
    Description,
    ItemQty,
    UnitPrice,
    TotalAmount,
}
