use sea_orm_migration::prelude::*;

use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000006_create_products_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Products::Table)
            .if_not_exists()
            .col(&mut id_column(Products::Id))
            .col(ColumnDef::new(Products::Category).string_len(64).not_null())
            .col(
                ColumnDef::new(Products::Name)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Products::MainImage).string_len(512).null())
            .col(
                ColumnDef::new(Products::NoVariants)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Category,
    Name,
    MainImage,
    NoVariants,
}
