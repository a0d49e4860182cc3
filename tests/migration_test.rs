mod common;

use beauty_erp::schema::TABLES;
use migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

/// `(type, name, sql)` for every user object in the database.
async fn schema_snapshot(db: &DatabaseConnection) -> Vec<(String, String, String)> {
    let rows = db
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT type, name, COALESCE(sql, '') AS sql FROM sqlite_master \
             WHERE name NOT LIKE 'sqlite_%' AND name != 'seaql_migrations' \
             ORDER BY type, name"
                .to_string(),
        ))
        .await
        .unwrap();
    rows.iter()
        .map(|row| {
            (
                row.try_get::<String>("", "type").unwrap(),
                row.try_get::<String>("", "name").unwrap(),
                row.try_get::<String>("", "sql").unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn migrations_create_every_table() {
    let db = common::memory_db().await;
    let snapshot = schema_snapshot(&db).await;
    for table in TABLES {
        assert!(
            snapshot.iter().any(|(kind, name, _)| kind == "table" && name == table),
            "missing table {table}"
        );
    }
    assert!(snapshot.iter().any(|(kind, _, _)| kind == "index"));

    let applied = Migrator::get_applied_migrations(&db).await.unwrap();
    assert_eq!(applied.len(), Migrator::migrations().len());
}

#[tokio::test]
async fn down_then_up_restores_the_same_schema() {
    let db = common::memory_db().await;
    let before = schema_snapshot(&db).await;

    Migrator::down(&db, None).await.unwrap();
    assert!(schema_snapshot(&db).await.is_empty());
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().len() == Migrator::migrations().len());

    Migrator::up(&db, None).await.unwrap();
    assert_eq!(schema_snapshot(&db).await, before);
}

#[tokio::test]
async fn migrating_twice_is_a_no_op() {
    let db = common::memory_db().await;
    let before = schema_snapshot(&db).await;
    beauty_erp::db::run_migrations(&db).await.unwrap();
    assert_eq!(schema_snapshot(&db).await, before);
}
