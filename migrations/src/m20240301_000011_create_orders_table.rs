use sea_orm_migration::prelude::*;

use super::m20240301_000005_create_customers_table::Customers;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000011_create_orders_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Orders::Table)
            .if_not_exists()
            .col(&mut id_column(Orders::Id))
            .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
            .col(ColumnDef::new(Orders::Items).json().not_null())
            .col(ColumnDef::new(Orders::Subtotal).decimal_len(12, 2).not_null())
            .col(ColumnDef::new(Orders::Discount).decimal_len(12, 2).not_null())
            .col(ColumnDef::new(Orders::NetTotal).decimal_len(12, 2).not_null())
            .col(
                ColumnDef::new(Orders::Status)
                    .string_len(20)
                    .not_null()
                    .default("pending"),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_orders_customer_id")
                    .from(Orders::Table, Orders::CustomerId)
                    .to(Customers::Table, Customers::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    CustomerId,
    Items,
    Subtotal,
    Discount,
    NetTotal,
    Status,
}
