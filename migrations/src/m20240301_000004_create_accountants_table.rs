use sea_orm_migration::prelude::*;

use super::m20240301_000002_create_users_table::Users;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000004_create_accountants_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Accountants::Table)
            .if_not_exists()
            .col(&mut id_column(Accountants::Id))
            .col(ColumnDef::new(Accountants::EmpCode).string_len(32).null())
            .col(ColumnDef::new(Accountants::SalesArea).string_len(128).null())
            .col(ColumnDef::new(Accountants::Location).string_len(128).null())
            .col(
                ColumnDef::new(Accountants::CustomerCount)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Accountants::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_accountants_emp_code")
                    .from(Accountants::Table, Accountants::EmpCode)
                    .to(Users::Table, Users::UserCode)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accountants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Accountants {
    Table,
    Id,
    EmpCode,
    SalesArea,
    Location,
    CustomerCount,
    IsActive,
}
