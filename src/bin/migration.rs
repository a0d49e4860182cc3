//! Schema migration CLI (`up`, `down`, `status`, `fresh`, `refresh`, `reset`).
//!
//! Reads the target from `DATABASE_URL` (or `-u`); when neither is given the
//! application configuration's `database_url` is used.

use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    if std::env::var_os("DATABASE_URL").is_none() {
        if let Ok(cfg) = beauty_erp::config::load_config() {
            std::env::set_var("DATABASE_URL", cfg.database_url);
        }
    }
    cli::run_cli(migrations::Migrator).await;
}
