use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A ticket number sold to a buyer.
/// Buyers are not stored on their own: name and phone are copied onto every
/// number of a sale and buyers are rebuilt by grouping.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sold_numbers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub raffle_id: i64,
    /// Rendered ticket label, e.g. "007"
    pub number: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub is_paid: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::raffles::Entity",
        from = "Column::RaffleId",
        to = "super::raffles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Raffle,
}

impl Related<super::raffles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Raffle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
