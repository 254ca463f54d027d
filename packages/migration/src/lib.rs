pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20250101_000001_auth_schema; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_auth_schema::Migration)]
    }
}

/// Apply every pending migration. Already-applied ones are skipped.
pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    tracing::info!(?backend, "applying pending migrations");

    let result = Migrator::up(db, None).await;
    match &result {
        Ok(()) => tracing::info!("migrations finished"),
        Err(e) => tracing::error!(error = %e, "migrations failed"),
    }
    result
}
