use sea_orm_migration::prelude::*;

use crate::m20260101_000001_create_raffles::Raffles;

/// Sold numbers: one row per ticket label assigned to a buyer
#[derive(DeriveIden)]
pub(crate) enum SoldNumbers {
    Table,
    Id,
    RaffleId,
    Number,
    BuyerName,
    BuyerPhone,
    IsPaid,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only accepts foreign keys at table creation time
        manager
            .create_table(
                Table::create()
                    .table(SoldNumbers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SoldNumbers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SoldNumbers::RaffleId).integer().not_null())
                    .col(ColumnDef::new(SoldNumbers::Number).string().not_null())
                    .col(ColumnDef::new(SoldNumbers::BuyerName).string().not_null())
                    .col(
                        ColumnDef::new(SoldNumbers::BuyerPhone)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(SoldNumbers::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sold_numbers_raffle")
                            .from(SoldNumbers::Table, SoldNumbers::RaffleId)
                            .to(Raffles::Table, Raffles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sold_numbers_raffle")
                    .table(SoldNumbers::Table)
                    .col(SoldNumbers::RaffleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SoldNumbers::Table)
                    .to_owned(),
            )
            .await
    }
}
