//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_vendor;
mod m20250901_000002_create_customer;
mod m20250901_000003_create_loyalty_card;
mod m20250901_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_vendor::Migration),
            Box::new(m20250901_000002_create_customer::Migration),
            Box::new(m20250901_000003_create_loyalty_card::Migration),
            // Indexes should always be applied last
            Box::new(m20250901_000004_add_indexes::Migration),
        ]
    }
}
