use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Raffle (rifa)
/// - range_start..=range_end: ticket numbers on sale, inclusive
/// - digits: zero-padded width of rendered numbers, 0 = no padding
/// - draw_date / lottery_name / prize / price: free text, empty when unset
/// - is_active: only active raffles count towards revenue
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "raffles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub range_start: i32,
    pub range_end: i32,
    pub digits: i32,
    pub draw_date: String,
    pub lottery_name: String,
    pub prize: String,
    /// Unit price as typed by the user; parsed leniently when reporting
    pub price: String,
    pub is_active: bool,
}

impl Model {
    /// Number of tickets in the range (0 for an inverted range)
    pub fn ticket_count(&self) -> i64 {
        (i64::from(self.range_end) - i64::from(self.range_start) + 1).max(0)
    }

    /// Unit price as a number, 0 when the text is not a valid decimal
    pub fn unit_price(&self) -> f64 {
        crate::utils::parse_price(&self.price)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sold_numbers::Entity")]
    SoldNumbers,
}

impl Related<super::sold_numbers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoldNumbers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
