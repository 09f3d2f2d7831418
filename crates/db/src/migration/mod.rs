//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder so they run on PostgreSQL and SQLite alike.

pub use sea_orm_migration::prelude::*;

use sea_orm::DatabaseBackend;

mod m20260301_000001_ledger_core;
mod m20260301_000002_security_deposits;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_ledger_core::Migration),
            Box::new(m20260301_000002_security_deposits::Migration),
        ]
    }
}

/// Money column: `NUMERIC(19, 4)` on PostgreSQL. SQLite caps declared
/// decimal precision at 16, so it gets an unsized decimal.
pub(crate) fn money_column<T: IntoIden>(manager: &SchemaManager, column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => def.decimal(),
        _ => def.decimal_len(19, 4),
    };
    def
}
