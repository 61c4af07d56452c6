use std::collections::HashMap;

use crate::entities::{raffle_entity, sold_number_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Revenue over active raffles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RevenueSummary {
    /// sold numbers x price
    pub gross: f64,
    /// paid numbers x price
    pub net: f64,
    /// whole range x price
    pub potential: f64,
}

impl RevenueSummary {
    /// Share of gross revenue already collected, 0 when nothing was sold
    pub fn progress(&self) -> f64 {
        if self.gross == 0.0 {
            0.0
        } else {
            self.net / self.gross
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SaleCounts {
    sold: i64,
    paid: i64,
}

fn counts_by_raffle(sold: &[sold_number_entity::Model]) -> HashMap<i64, SaleCounts> {
    let mut counts: HashMap<i64, SaleCounts> = HashMap::new();
    for s in sold {
        let entry = counts.entry(s.raffle_id).or_default();
        entry.sold += 1;
        if s.is_paid {
            entry.paid += 1;
        }
    }
    counts
}

/// Gross, net and potential revenue. Inactive raffles are ignored and an
/// unparsable price contributes 0.
pub fn compute_revenue(
    raffles: &[raffle_entity::Model],
    sold: &[sold_number_entity::Model],
) -> RevenueSummary {
    let counts = counts_by_raffle(sold);

    raffles
        .iter()
        .filter(|r| r.is_active)
        .fold(RevenueSummary::default(), |mut acc, raffle| {
            let price = raffle.unit_price();
            let c = counts.get(&raffle.id).copied().unwrap_or_default();
            acc.gross += c.sold as f64 * price;
            acc.net += c.paid as f64 * price;
            acc.potential += raffle.ticket_count() as f64 * price;
            acc
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopBuyer {
    pub name: String,
    pub count: usize,
}

/// Most loyal buyers across every raffle, keyed by trimmed phone.
/// Ties keep the order in which buyers first appear.
pub fn top_buyers_by_volume(sold: &[sold_number_entity::Model], limit: usize) -> Vec<TopBuyer> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buyers: Vec<TopBuyer> = Vec::new();

    for s in sold {
        let phone = s.buyer_phone.trim();
        match index.get(phone) {
            Some(&i) => buyers[i].count += 1,
            None => {
                index.insert(phone, buyers.len());
                buyers.push(TopBuyer {
                    name: s.buyer_name.clone(),
                    count: 1,
                });
            }
        }
    }

    buyers.sort_by(|a, b| b.count.cmp(&a.count));
    buyers.truncate(limit);
    buyers
}

/// Collected vs. sold amount of one active raffle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RafflePaymentStatus {
    pub raffle_id: i64,
    pub name: String,
    pub sold_count: i64,
    pub paid_count: i64,
    pub unit_price: f64,
    pub sold_amount: f64,
    pub paid_amount: f64,
}

pub fn raffle_payment_status(
    raffles: &[raffle_entity::Model],
    sold: &[sold_number_entity::Model],
) -> Vec<RafflePaymentStatus> {
    let counts = counts_by_raffle(sold);

    raffles
        .iter()
        .filter(|r| r.is_active)
        .map(|raffle| {
            let price = raffle.unit_price();
            let c = counts.get(&raffle.id).copied().unwrap_or_default();
            RafflePaymentStatus {
                raffle_id: raffle.id,
                name: raffle.name.clone(),
                sold_count: c.sold,
                paid_count: c.paid,
                unit_price: price,
                sold_amount: c.sold as f64 * price,
                paid_amount: c.paid as f64 * price,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevenueResponse {
    pub gross: f64,
    pub net: f64,
    pub potential: f64,
    pub progress: f64,
}

impl From<RevenueSummary> for RevenueResponse {
    fn from(r: RevenueSummary) -> Self {
        Self {
            gross: r.gross,
            net: r.net,
            potential: r.potential,
            progress: r.progress(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub revenue: RevenueResponse,
    pub top_buyers: Vec<TopBuyer>,
    pub payment_status: Vec<RafflePaymentStatus>,
    pub raffle_count: usize,
    pub active_raffle_count: usize,
    pub sold_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raffle(id: i64, start: i32, end: i32, price: &str, active: bool) -> raffle_entity::Model {
        raffle_entity::Model {
            id,
            name: format!("Rifa {id}"),
            range_start: start,
            range_end: end,
            digits: 2,
            draw_date: String::new(),
            lottery_name: String::new(),
            prize: String::new(),
            price: price.to_string(),
            is_active: active,
        }
    }

    fn sold(id: i64, raffle_id: i64, name: &str, phone: &str, paid: bool) -> sold_number_entity::Model {
        sold_number_entity::Model {
            id,
            raffle_id,
            number: format!("{id:02}"),
            buyer_name: name.to_string(),
            buyer_phone: phone.to_string(),
            is_paid: paid,
        }
    }

    #[test]
    fn test_revenue_one_active_raffle() {
        let raffles = vec![raffle(1, 0, 9, "1000", true)];
        let tickets = vec![
            sold(1, 1, "Ana", "555", true),
            sold(2, 1, "Ana", "555", false),
            sold(3, 1, "Beto", "300", false),
        ];

        let revenue = compute_revenue(&raffles, &tickets);
        assert_eq!(revenue.gross, 3000.0);
        assert_eq!(revenue.net, 1000.0);
        assert_eq!(revenue.potential, 10000.0);
        assert!((revenue.progress() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_ignores_inactive_raffles() {
        let raffles = vec![
            raffle(1, 0, 9, "1000", true),
            raffle(2, 0, 99, "500", false),
        ];
        let tickets = vec![sold(1, 1, "Ana", "555", true), sold(2, 2, "Ana", "555", true)];

        let revenue = compute_revenue(&raffles, &tickets);
        assert_eq!(revenue.gross, 1000.0);
        assert_eq!(revenue.net, 1000.0);
        assert_eq!(revenue.potential, 10000.0);
    }

    #[test]
    fn test_unparsable_price_counts_as_zero() {
        let raffles = vec![
            raffle(1, 0, 9, "not-a-number", true),
            raffle(2, 1, 4, "250", true),
        ];
        let tickets = vec![sold(1, 1, "Ana", "555", true), sold(2, 2, "Beto", "300", false)];

        let revenue = compute_revenue(&raffles, &tickets);
        assert_eq!(revenue.gross, 250.0);
        assert_eq!(revenue.net, 0.0);
        assert_eq!(revenue.potential, 1000.0);
    }

    #[test]
    fn test_progress_without_sales_is_zero() {
        let revenue = compute_revenue(&[raffle(1, 0, 9, "1000", true)], &[]);
        assert_eq!(revenue.gross, 0.0);
        assert_eq!(revenue.progress(), 0.0);
        assert_eq!(RevenueResponse::from(revenue).progress, 0.0);
    }

    #[test]
    fn test_top_buyers_limit_and_order() {
        let mut tickets = Vec::new();
        let mut id = 0;
        // buyer i buys i + 1 numbers
        for buyer in 0..11 {
            for _ in 0..=buyer {
                id += 1;
                tickets.push(sold(id, 1, &format!("Buyer {buyer}"), &format!("30{buyer}"), false));
            }
        }

        let top = top_buyers_by_volume(&tickets, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], TopBuyer { name: "Buyer 10".into(), count: 11 });
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(top.iter().all(|b| b.name != "Buyer 0"));
    }

    #[test]
    fn test_top_buyers_group_by_trimmed_phone_and_keep_first_name() {
        let tickets = vec![
            sold(1, 1, "Ana", "555 ", false),
            sold(2, 2, "Ana María", " 555", true),
            sold(3, 1, "Beto", "300", false),
            sold(4, 1, "Carla", "301", false),
        ];

        let top = top_buyers_by_volume(&tickets, 10);
        assert_eq!(
            top,
            vec![
                TopBuyer { name: "Ana".into(), count: 2 },
                TopBuyer { name: "Beto".into(), count: 1 },
                TopBuyer { name: "Carla".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_payment_status_per_active_raffle() {
        let raffles = vec![raffle(2, 0, 9, "100", true), raffle(1, 0, 9, "50", false)];
        let tickets = vec![sold(1, 2, "Ana", "555", true), sold(2, 2, "Beto", "300", false)];

        let status = raffle_payment_status(&raffles, &tickets);
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].raffle_id, 2);
        assert_eq!(status[0].sold_count, 2);
        assert_eq!(status[0].paid_count, 1);
        assert_eq!(status[0].sold_amount, 200.0);
        assert_eq!(status[0].paid_amount, 100.0);
    }
}
