pub use sea_orm_migration::prelude::*;

mod columns;
mod m20240301_000001_create_user_types_table;
mod m20240301_000002_create_users_table;
mod m20240301_000003_create_sales_reps_table;
mod m20240301_000004_create_accountants_table;
mod m20240301_000005_create_customers_table;
mod m20240301_000006_create_products_table;
mod m20240301_000007_create_variants_table;
mod m20240301_000008_create_quotations_table;
mod m20240301_000009_create_quotation_items_table;
mod m20240301_000010_create_invoices_table;
mod m20240301_000011_create_orders_table;
mod m20240315_000012_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user_types_table::Migration),
            Box::new(m20240301_000002_create_users_table::Migration),
            Box::new(m20240301_000003_create_sales_reps_table::Migration),
            Box::new(m20240301_000004_create_accountants_table::Migration),
            Box::new(m20240301_000005_create_customers_table::Migration),
            Box::new(m20240301_000006_create_products_table::Migration),
            Box::new(m20240301_000007_create_variants_table::Migration),
            Box::new(m20240301_000008_create_quotations_table::Migration),
            Box::new(m20240301_000009_create_quotation_items_table::Migration),
            Box::new(m20240301_000010_create_invoices_table::Migration),
            Box::new(m20240301_000011_create_orders_table::Migration),
            Box::new(m20240315_000012_add_lookup_indexes::Migration),
        ]
    }
}
