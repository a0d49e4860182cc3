use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accountant profile attached to an employee user.
///
/// `emp_code` is cleared when the owning user is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accountants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub emp_code: Option<String>,
    #[sea_orm(nullable)]
    pub sales_area: Option<String>,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    pub customer_count: i32,
    pub is_active: bool,
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
        belongs_to = "super::user::Entity",
        from = "Column::EmpCode",
        to = "super::user::Column::UserCode",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

timestamped_behavior!();
