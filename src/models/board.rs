use std::collections::HashMap;

use crate::entities::{raffle_entity, sold_number_entity};
use crate::utils::compute_ticket_universe;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RaffleResponse;

/// One cell of the ticket grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketCell {
    pub number: String,
    pub sold: bool,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
}

/// Ticket grid of a raffle with sale state per number
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaffleBoardResponse {
    pub raffle: RaffleResponse,
    pub sold_count: usize,
    pub available_count: usize,
    pub cells: Vec<TicketCell>,
}

impl RaffleBoardResponse {
    pub fn build(raffle: raffle_entity::Model, sold: &[sold_number_entity::Model]) -> Self {
        let by_number: HashMap<&str, &sold_number_entity::Model> =
            sold.iter().map(|s| (s.number.as_str(), s)).collect();

        let cells: Vec<TicketCell> = compute_ticket_universe(&raffle)
            .into_iter()
            .map(|number| match by_number.get(number.as_str()) {
                Some(s) => TicketCell {
                    sold: true,
                    paid: s.is_paid,
                    buyer_name: Some(s.buyer_name.clone()),
                    number,
                },
                None => TicketCell {
                    number,
                    sold: false,
                    paid: false,
                    buyer_name: None,
                },
            })
            .collect();

        let sold_count = cells.iter().filter(|c| c.sold).count();
        Self {
            raffle: raffle.into(),
            available_count: cells.len() - sold_count,
            sold_count,
            cells,
        }
    }
}
