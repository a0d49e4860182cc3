use sea_orm_migration::prelude::*;

use super::m20240301_000006_create_products_table::Products;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000007_create_variants_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Variants::Table)
            .if_not_exists()
            .col(&mut id_column(Variants::Id))
            .col(ColumnDef::new(Variants::ProductId).integer().not_null())
            .col(
                ColumnDef::new(Variants::ProductCode)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Variants::Color).string_len(64).null())
            .col(ColumnDef::new(Variants::Price).decimal_len(12, 2).not_null())
            .col(ColumnDef::new(Variants::Image).string_len(512).null())
            .col(
                ColumnDef::new(Variants::Quantity)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Variants::MinQty)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Variants::MfdDate).date().null())
            .col(ColumnDef::new(Variants::ExpDate).date().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_variants_product_id")
                    .from(Variants::Table, Variants::ProductId)
                    .to(Products::Table, Products::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Variants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Variants {
    Table,
    Id,
    ProductId,
    ProductCode,
    Color,
    Price,
    Image,
    Quantity,
    MinQty,
    MfdDate,
    ExpDate,
}
