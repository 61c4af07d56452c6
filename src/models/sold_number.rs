use crate::entities::sold_number_entity;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One sale: a buyer takes one or more numbers of a raffle
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SellNumbersRequest {
    pub numbers: Vec<String>,
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_phone: String,
}

impl SellNumbersRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.buyer_name.trim().is_empty() {
            return Err(AppError::ValidationError("Buyer name is required".into()));
        }
        if self.numbers.is_empty() {
            return Err(AppError::ValidationError(
                "Select at least one number".into(),
            ));
        }
        Ok(())
    }
}

/// Replaces the buyer fields and payment flag of one sold number
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateSoldNumberRequest {
    pub buyer_name: String,
    #[serde(default)]
    pub buyer_phone: String,
    pub is_paid: bool,
}

impl UpdateSoldNumberRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.buyer_name.trim().is_empty() {
            return Err(AppError::ValidationError("Buyer name is required".into()));
        }
        Ok(())
    }
}

/// A buyer's whole set of numbers, addressed by id
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SoldNumberIdsRequest {
    pub ids: Vec<i64>,
}

impl SoldNumberIdsRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.ids.is_empty() {
            return Err(AppError::ValidationError("No numbers given".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SoldNumberResponse {
    pub id: i64,
    pub raffle_id: i64,
    pub number: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub is_paid: bool,
}

impl From<sold_number_entity::Model> for SoldNumberResponse {
    fn from(m: sold_number_entity::Model) -> Self {
        Self {
            id: m.id,
            raffle_id: m.raffle_id,
            number: m.number,
            buyer_name: m.buyer_name,
            buyer_phone: m.buyer_phone,
            is_paid: m.is_paid,
        }
    }
}

/// Rows touched by a batch operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchResult {
    pub affected: u64,
}
