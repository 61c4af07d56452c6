pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_raffles;
mod m20260101_000002_create_sold_numbers;
mod m20260102_000001_unique_sold_number;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_raffles::Migration),
            Box::new(m20260101_000002_create_sold_numbers::Migration),
            Box::new(m20260102_000001_unique_sold_number::Migration),
        ]
    }
}
