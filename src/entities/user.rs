use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_code: String,
    pub user_type_id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string, never serialized.
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    #[sea_orm(nullable)]
    pub address: Option<String>,
    #[sea_orm(nullable)]
    pub email: Option<String>,
    #[sea_orm(nullable)]
    pub dob: Option<Date>,
    #[sea_orm(nullable)]
    pub contact: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    #[serde(rename = "createdAt")]
    pub created_at: DateTimeUtc,
    #[sea_orm(column_name = "updatedAt")]
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_type::Entity",
        from = "Column::UserTypeId",
        to = "super::user_type::Column::UserTypeId",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    UserType,
    #[sea_orm(has_many = "super::sales_rep::Entity")]
    SalesReps,
    #[sea_orm(has_many = "super::accountant::Entity")]
    Accountants,
    #[sea_orm(has_many = "super::customer::Entity")]
    Customers,
}

impl Related<super::user_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserType.def()
    }
}

impl Related<super::sales_rep::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesReps.def()
    }
}

impl Related<super::accountant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accountants.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

timestamped_behavior!();
