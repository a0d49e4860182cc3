use sea_orm_migration::prelude::*;

use super::m20240301_000002_create_users_table::Users;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000005_create_customers_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Customers::Table)
            .if_not_exists()
            .col(&mut id_column(Customers::Id))
            .col(ColumnDef::new(Customers::UserCode).string_len(32).not_null())
            .col(ColumnDef::new(Customers::FirstName).string_len(64).not_null())
            .col(ColumnDef::new(Customers::LastName).string_len(64).not_null())
            .col(ColumnDef::new(Customers::Email).string_len(255).null())
            .col(ColumnDef::new(Customers::Contact1).string_len(32).null())
            .col(ColumnDef::new(Customers::Contact2).string_len(32).null())
            .col(ColumnDef::new(Customers::AddressLine1).string_len(255).null())
            .col(ColumnDef::new(Customers::AddressLine2).string_len(255).null())
            .col(ColumnDef::new(Customers::City).string_len(64).null())
            .col(ColumnDef::new(Customers::PostalCode).string_len(16).null())
            .col(ColumnDef::new(Customers::Note).text().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_customers_user_code")
                    .from(Customers::Table, Customers::UserCode)
                    .to(Users::Table, Users::UserCode)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    UserCode,
    FirstName,
    LastName,
    Email,
    #[sea_orm(iden = "contact_1")]
    Contact1,
    #[sea_orm(iden = "contact_2")]
    Contact2,
    #[sea_orm(iden = "address_line_1")]
    AddressLine1,
    #[sea_orm(iden = "address_line_2")]
    AddressLine2,
    City,
    PostalCode,
    Note,
}
