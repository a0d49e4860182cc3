//! Declarative table of every foreign key in the schema.
//!
//! The same associations are declared on the entities' `Relation` enums and
//! created by the migrations; this table is the single readable overview and
//! is checked against both in tests.

/// Referential action applied to child rows when the parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
}

impl OnDelete {
    /// Spelling used by SQL catalogs (`PRAGMA foreign_key_list`,
    /// `information_schema`).
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
        }
    }
}

/// `child.foreign_key` belongs to `parent.target_key`; read the other way,
/// `parent` has many `child` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub child: &'static str,
    pub foreign_key: &'static str,
    pub parent: &'static str,
    pub target_key: &'static str,
    pub on_delete: OnDelete,
}

const fn assoc(
    child: &'static str,
    foreign_key: &'static str,
    parent: &'static str,
    target_key: &'static str,
    on_delete: OnDelete,
) -> Association {
    Association {
        child,
        foreign_key,
        parent,
        target_key,
        on_delete,
    }
}

pub const ASSOCIATIONS: &[Association] = &[
    assoc("users", "user_type_id", "user_types", "user_type_id", OnDelete::Restrict),
    assoc("sales_reps", "emp_code", "users", "user_code", OnDelete::SetNull),
    assoc("accountants", "emp_code", "users", "user_code", OnDelete::SetNull),
    assoc("customers", "user_code", "users", "user_code", OnDelete::Cascade),
    assoc("variants", "product_id", "products", "id", OnDelete::Cascade),
    assoc("quotations", "customer_id", "customers", "id", OnDelete::SetNull),
    assoc("quotation_items", "quotation_id", "quotations", "quotation_id", OnDelete::Cascade),
    assoc("quotation_items", "item_code", "variants", "product_code", OnDelete::Restrict),
    assoc("invoices", "quotation_id", "quotations", "quotation_id", OnDelete::SetNull),
    assoc("orders", "customer_id", "customers", "id", OnDelete::Restrict),
];

pub const TABLES: &[&str] = &[
    "user_types",
    "users",
    "sales_reps",
    "accountants",
    "customers",
    "products",
    "variants",
    "quotations",
    "quotation_items",
    "invoices",
    "orders",
];

pub fn belongs_to(table: &str) -> impl Iterator<Item = &'static Association> + '_ {
    ASSOCIATIONS.iter().filter(move |a| a.child == table)
}

pub fn has_many(table: &str) -> impl Iterator<Item = &'static Association> + '_ {
    ASSOCIATIONS.iter().filter(move |a| a.parent == table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use crate::entities::{
        accountant, customer, invoice, order, quotation, quotation_item, sales_rep, user, variant,
    };
    use sea_orm::{
        sea_query::ForeignKeyAction, ConnectionTrait, DbBackend, RelationDef, RelationTrait,
        Statement,
    };
    use std::collections::BTreeSet;

    fn same_action(on_delete: OnDelete, action: Option<ForeignKeyAction>) -> bool {
        matches!(
            (on_delete, action),
            (OnDelete::Cascade, Some(ForeignKeyAction::Cascade))
                | (OnDelete::SetNull, Some(ForeignKeyAction::SetNull))
                | (OnDelete::Restrict, Some(ForeignKeyAction::Restrict))
        )
    }

    #[test]
    fn navigation_helpers() {
        let user_children: BTreeSet<_> = has_many("users").map(|a| a.child).collect();
        assert_eq!(
            user_children,
            BTreeSet::from(["accountants", "customers", "sales_reps"])
        );
        assert_eq!(belongs_to("quotation_items").count(), 2);
        assert_eq!(belongs_to("products").count(), 0);
        for a in ASSOCIATIONS {
            assert!(TABLES.contains(&a.child) && TABLES.contains(&a.parent));
        }
    }

    #[test]
    fn entity_relations_declare_the_same_delete_rules() {
        let defs: Vec<(&str, &str, RelationDef)> = vec![
            ("users", "user_type_id", user::Relation::UserType.def()),
            ("sales_reps", "emp_code", sales_rep::Relation::User.def()),
            ("accountants", "emp_code", accountant::Relation::User.def()),
            ("customers", "user_code", customer::Relation::User.def()),
            ("variants", "product_id", variant::Relation::Product.def()),
            ("quotations", "customer_id", quotation::Relation::Customer.def()),
            ("quotation_items", "quotation_id", quotation_item::Relation::Quotation.def()),
            ("quotation_items", "item_code", quotation_item::Relation::Variant.def()),
            ("invoices", "quotation_id", invoice::Relation::Quotation.def()),
            ("orders", "customer_id", order::Relation::Customer.def()),
        ];
        assert_eq!(defs.len(), ASSOCIATIONS.len());

        for (child, fk, def) in defs {
            let assoc = ASSOCIATIONS
                .iter()
                .find(|a| a.child == child && a.foreign_key == fk)
                .unwrap_or_else(|| panic!("{child}.{fk} missing from ASSOCIATIONS"));
            assert!(
                same_action(assoc.on_delete, def.on_delete),
                "{child}.{fk}: entity declares {:?}",
                def.on_delete
            );
        }
    }

    #[tokio::test]
    async fn migrations_create_the_declared_foreign_keys() {
        let db = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        run_migrations(&db).await.unwrap();

        for table in TABLES {
            let rows = db
                .query_all(Statement::from_string(
                    DbBackend::Sqlite,
                    format!("PRAGMA foreign_key_list({})", table),
                ))
                .await
                .unwrap();

            let actual: BTreeSet<(String, String, String, String)> = rows
                .iter()
                .map(|row| {
                    (
                        row.try_get::<String>("", "from").unwrap(),
                        row.try_get::<String>("", "table").unwrap(),
                        row.try_get::<String>("", "to").unwrap(),
                        row.try_get::<String>("", "on_delete").unwrap(),
                    )
                })
                .collect();
            let expected: BTreeSet<(String, String, String, String)> = belongs_to(table)
                .map(|a| {
                    (
                        a.foreign_key.to_string(),
                        a.parent.to_string(),
                        a.target_key.to_string(),
                        a.on_delete.as_sql().to_string(),
                    )
                })
                .collect();
            assert_eq!(actual, expected, "foreign keys of {}", table);
        }
    }
}
