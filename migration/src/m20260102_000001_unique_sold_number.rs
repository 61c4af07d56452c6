use sea_orm_migration::prelude::*;

use crate::m20260101_000002_create_sold_numbers::SoldNumbers;

/// A ticket label can be sold at most once per raffle.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sold_numbers_raffle_number_unique")
                    .table(SoldNumbers::Table)
                    .col(SoldNumbers::RaffleId)
                    .col(SoldNumbers::Number)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sold_numbers_raffle_number_unique")
                    .table(SoldNumbers::Table)
                    .to_owned(),
            )
            .await
    }
}
