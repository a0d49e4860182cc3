use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_user_types_table::UserTypes;
use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000002_create_users_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(&mut id_column(Users::Id))
            .col(
                ColumnDef::new(Users::UserCode)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::UserTypeId).integer().not_null())
            .col(
                ColumnDef::new(Users::Username)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::Password).string_len(255).not_null())
            .col(ColumnDef::new(Users::Name).string_len(128).not_null())
            .col(ColumnDef::new(Users::Address).string_len(255).null())
            .col(ColumnDef::new(Users::Email).string_len(255).null())
            .col(ColumnDef::new(Users::Dob).date().null())
            .col(ColumnDef::new(Users::Contact).string_len(32).null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_users_user_type_id")
                    .from(Users::Table, Users::UserTypeId)
                    .to(UserTypes::Table, UserTypes::UserTypeId)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    UserCode,
    UserTypeId,
    Username,
    Password,
    Name,
    Address,
    Email,
    Dob,
    Contact,
}
