use sea_orm_migration::prelude::*;

/// Raffles (rifas): one row per numbered-ticket drawing
#[derive(DeriveIden)]
pub(crate) enum Raffles {
    Table,
    Id,
    Name,
    RangeStart,
    RangeEnd,
    Digits,
    DrawDate,
    LotteryName,
    Prize,
    Price,
    IsActive,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Raffles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Raffles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Raffles::Name).string().not_null())
                    .col(ColumnDef::new(Raffles::RangeStart).integer().not_null())
                    .col(ColumnDef::new(Raffles::RangeEnd).integer().not_null())
                    .col(
                        ColumnDef::new(Raffles::Digits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // free text fields, empty string when not provided
                    .col(
                        ColumnDef::new(Raffles::DrawDate)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Raffles::LotteryName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Raffles::Prize)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Raffles::Price)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Raffles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Raffles::Table).to_owned())
            .await
    }
}
