use sea_orm_migration::prelude::*;

use super::m20240301_000008_create_quotations_table::Quotations;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000010_create_invoices_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Invoices::Table)
            .if_not_exists()
            .col(&mut id_column(Invoices::Id))
            .col(
                ColumnDef::new(Invoices::InvoiceNo)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Invoices::QuotationId).string_len(32).null())
            .col(ColumnDef::new(Invoices::CrBy).string_len(64).null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_invoices_quotation_id")
                    .from(Invoices::Table, Invoices::QuotationId)
                    .to(Quotations::Table, Quotations::QuotationId)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Invoices {
    Table,
    Id,
    InvoiceNo,
    QuotationId,
    CrBy,
}
