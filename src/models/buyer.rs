use std::collections::HashMap;

use crate::entities::sold_number_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SoldNumberResponse;

/// Which buyer list is being built.
///
/// The two lists key buyers differently: the global list normalises the name
/// (lowercase, trimmed) and trims the phone, the per-raffle list concatenates
/// the raw fields. Existing grouped views depend on both behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyerScope {
    Global,
    Raffle,
}

impl BuyerScope {
    fn key(self, sold: &sold_number_entity::Model) -> String {
        match self {
            BuyerScope::Global => format!(
                "{}{}",
                sold.buyer_name.to_lowercase().trim(),
                sold.buyer_phone.trim()
            ),
            BuyerScope::Raffle => format!("{}{}", sold.buyer_name, sold.buyer_phone),
        }
    }
}

/// A buyer rebuilt from their sold numbers. Name and phone are taken from
/// the first record of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerSummary {
    pub name: String,
    pub phone: String,
    pub sold_numbers: Vec<sold_number_entity::Model>,
}

impl BuyerSummary {
    pub fn is_fully_paid(&self) -> bool {
        self.sold_numbers.iter().all(|s| s.is_paid)
    }

    pub fn numbers_list_text(&self) -> String {
        self.sold_numbers
            .iter()
            .map(|s| s.number.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn ids(&self) -> Vec<i64> {
        self.sold_numbers.iter().map(|s| s.id).collect()
    }

    pub fn unpaid_ids(&self) -> Vec<i64> {
        self.sold_numbers
            .iter()
            .filter(|s| !s.is_paid)
            .map(|s| s.id)
            .collect()
    }
}

/// Groups sold numbers by buyer.
///
/// Global lists come back sorted by display name; per-raffle lists keep the
/// order in which each buyer first appears.
pub fn group_by_buyer(
    sold: &[sold_number_entity::Model],
    scope: BuyerScope,
) -> Vec<BuyerSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<BuyerSummary> = Vec::new();

    for record in sold {
        let key = scope.key(record);
        match index.get(&key) {
            Some(&i) => groups[i].sold_numbers.push(record.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(BuyerSummary {
                    name: record.buyer_name.clone(),
                    phone: record.buyer_phone.clone(),
                    sold_numbers: vec![record.clone()],
                });
            }
        }
    }

    if scope == BuyerScope::Global {
        groups.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatusFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

/// Buyer list filter: free-text search plus payment status
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BuyerQuery {
    /// Case-insensitive match on the buyer name, or substring of any number
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: PaymentStatusFilter,
}

impl BuyerQuery {
    pub fn matches(&self, buyer: &BuyerSummary) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => {
                buyer.name.to_lowercase().contains(&query.to_lowercase())
                    || buyer.sold_numbers.iter().any(|s| s.number.contains(query))
            }
        };
        let matches_status = match self.status {
            PaymentStatusFilter::All => true,
            PaymentStatusFilter::Paid => buyer.is_fully_paid(),
            PaymentStatusFilter::Unpaid => !buyer.is_fully_paid(),
        };
        matches_search && matches_status
    }

    pub fn apply(&self, buyers: Vec<BuyerSummary>) -> Vec<BuyerSummary> {
        buyers.into_iter().filter(|b| self.matches(b)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BuyerSummaryResponse {
    pub name: String,
    pub phone: String,
    pub is_fully_paid: bool,
    pub numbers_list_text: String,
    pub ticket_count: usize,
    pub sold_numbers: Vec<SoldNumberResponse>,
}

impl From<BuyerSummary> for BuyerSummaryResponse {
    fn from(b: BuyerSummary) -> Self {
        let is_fully_paid = b.is_fully_paid();
        let numbers_list_text = b.numbers_list_text();
        Self {
            name: b.name,
            phone: b.phone,
            is_fully_paid,
            numbers_list_text,
            ticket_count: b.sold_numbers.len(),
            sold_numbers: b.sold_numbers.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sold(id: i64, number: &str, name: &str, phone: &str, paid: bool) -> sold_number_entity::Model {
        sold_number_entity::Model {
            id,
            raffle_id: 1,
            number: number.to_string(),
            buyer_name: name.to_string(),
            buyer_phone: phone.to_string(),
            is_paid: paid,
        }
    }

    #[test]
    fn test_group_single_buyer_partially_paid() {
        let tickets = vec![
            sold(1, "01", "Ana", "555", false),
            sold(2, "02", "Ana", "555", true),
        ];

        for scope in [BuyerScope::Global, BuyerScope::Raffle] {
            let buyers = group_by_buyer(&tickets, scope);
            assert_eq!(buyers.len(), 1);
            assert_eq!(buyers[0].name, "Ana");
            assert!(!buyers[0].is_fully_paid());
            assert_eq!(buyers[0].numbers_list_text(), "01, 02");
            assert_eq!(buyers[0].unpaid_ids(), vec![1]);
        }
    }

    #[test]
    fn test_empty_input_yields_no_buyers() {
        assert!(group_by_buyer(&[], BuyerScope::Global).is_empty());
        assert!(group_by_buyer(&[], BuyerScope::Raffle).is_empty());
    }

    #[test]
    fn test_global_scope_normalises_key_and_sorts_by_name() {
        let tickets = vec![
            sold(1, "10", "Pedro", "300", false),
            sold(2, "11", " ana ", "555 ", false),
            sold(3, "12", "ANA", "555", true),
            sold(4, "13", "Beto", "", true),
        ];

        let buyers = group_by_buyer(&tickets, BuyerScope::Global);
        let names: Vec<&str> = buyers.iter().map(|b| b.name.as_str()).collect();
        // " ana " sorts first: a leading space orders before letters
        assert_eq!(names, vec![" ana ", "Beto", "Pedro"]);
        assert_eq!(buyers[0].numbers_list_text(), "11, 12");
    }

    #[test]
    fn test_raffle_scope_uses_raw_key_and_first_seen_order() {
        let tickets = vec![
            sold(1, "10", "Pedro", "300", false),
            sold(2, "11", "Ana", "555", false),
            sold(3, "12", "ana", "555", true),
            sold(4, "13", "Pedro", "300", true),
        ];

        let buyers = group_by_buyer(&tickets, BuyerScope::Raffle);
        let names: Vec<&str> = buyers.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Pedro", "Ana", "ana"]);
        assert_eq!(buyers[0].numbers_list_text(), "10, 13");
    }

    #[test]
    fn test_query_filters() {
        let buyers = group_by_buyer(
            &[
                sold(1, "07", "Ana", "555", true),
                sold(2, "08", "Beto", "300", false),
                sold(3, "19", "Carla", "301", true),
                sold(4, "20", "Carla", "301", false),
            ],
            BuyerScope::Global,
        );

        let paid = BuyerQuery {
            search: None,
            status: PaymentStatusFilter::Paid,
        };
        let names: Vec<String> = paid.apply(buyers.clone()).into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Ana"]);

        let unpaid = BuyerQuery {
            search: None,
            status: PaymentStatusFilter::Unpaid,
        };
        assert_eq!(unpaid.apply(buyers.clone()).len(), 2);

        let by_name = BuyerQuery {
            search: Some("CAR".into()),
            status: PaymentStatusFilter::All,
        };
        assert_eq!(by_name.apply(buyers.clone())[0].name, "Carla");

        let by_number = BuyerQuery {
            search: Some("08".into()),
            status: PaymentStatusFilter::All,
        };
        assert_eq!(by_number.apply(buyers.clone())[0].name, "Beto");

        assert_eq!(BuyerQuery::default().apply(buyers).len(), 3);
    }

    #[test]
    fn test_response_carries_derived_fields() {
        let buyer = group_by_buyer(&[sold(1, "05", "Ana", "555", true)], BuyerScope::Raffle)
            .remove(0);
        let response = BuyerSummaryResponse::from(buyer);
        assert!(response.is_fully_paid);
        assert_eq!(response.numbers_list_text, "05");
        assert_eq!(response.ticket_count, 1);
    }
}
