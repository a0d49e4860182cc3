use sea_orm_migration::prelude::*;

use crate::columns::{add_timestamps, id_column};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000001_create_user_types_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(UserTypes::Table)
            .if_not_exists()
            .col(&mut id_column(UserTypes::Id))
            .col(
                ColumnDef::new(UserTypes::UserTypeId)
                    .integer()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(UserTypes::TypeName).string_len(64).not_null())
            .col(
                ColumnDef::new(UserTypes::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .to_owned();
        add_timestamps(&mut table);

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserTypes {
    Table,
    Id,
    UserTypeId,
    TypeName,
    IsActive,
}
