use crate::entities::raffle_entity;
use crate::error::{AppError, AppResult};
use crate::utils::digits_for_range_input;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest ticket range a raffle may span
pub const MAX_TICKETS: i64 = 100_000;
/// Widest zero-padding a raffle may render with
pub const MAX_DIGITS: i32 = 9;

/// Validated raffle fields, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRaffle {
    pub name: String,
    pub range_start: i32,
    pub range_end: i32,
    pub digits: i32,
    pub draw_date: String,
    pub lottery_name: String,
    pub prize: String,
    pub price: String,
    pub is_active: bool,
}

impl NewRaffle {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("Raffle name is required".into()));
        }
        if self.range_end < self.range_start {
            return Err(AppError::ValidationError(format!(
                "Range end {} is lower than range start {}",
                self.range_end, self.range_start
            )));
        }
        let tickets = i64::from(self.range_end) - i64::from(self.range_start) + 1;
        if tickets > MAX_TICKETS {
            return Err(AppError::ValidationError(format!(
                "A raffle may have at most {MAX_TICKETS} tickets, got {tickets}"
            )));
        }
        if !(0..=MAX_DIGITS).contains(&self.digits) {
            return Err(AppError::ValidationError(format!(
                "Digits must be between 0 and {MAX_DIGITS}"
            )));
        }
        Ok(())
    }
}

/// Raffle creation form. The range endpoints arrive as typed text so the padding
/// width can be derived from what the user wrote ("000".."999").
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateRaffleRequest {
    pub name: String,
    pub range_start: String,
    pub range_end: String,
    /// Defaults to the longer of the two typed endpoints
    #[serde(default)]
    pub digits: Option<i32>,
    #[serde(default)]
    pub draw_date: String,
    #[serde(default)]
    pub lottery_name: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub price: String,
}

impl CreateRaffleRequest {
    pub fn validate(&self) -> AppResult<NewRaffle> {
        let range_start = parse_endpoint("range_start", &self.range_start)?;
        let range_end = parse_endpoint("range_end", &self.range_end)?;
        let digits = self
            .digits
            .unwrap_or_else(|| digits_for_range_input(&self.range_start, &self.range_end));

        let raffle = NewRaffle {
            name: self.name.trim().to_string(),
            range_start,
            range_end,
            digits,
            draw_date: self.draw_date.clone(),
            lottery_name: self.lottery_name.clone(),
            prize: self.prize.clone(),
            price: self.price.clone(),
            is_active: true,
        };
        raffle.validate()?;
        Ok(raffle)
    }
}

fn parse_endpoint(field: &str, text: &str) -> AppResult<i32> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| AppError::ValidationError(format!("{field} must be an integer")))
}

/// Full replacement of a raffle
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateRaffleRequest {
    pub name: String,
    pub range_start: i32,
    pub range_end: i32,
    pub digits: i32,
    #[serde(default)]
    pub draw_date: String,
    #[serde(default)]
    pub lottery_name: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub price: String,
    pub is_active: bool,
}

impl UpdateRaffleRequest {
    pub fn validate(&self) -> AppResult<NewRaffle> {
        let raffle = NewRaffle {
            name: self.name.trim().to_string(),
            range_start: self.range_start,
            range_end: self.range_end,
            digits: self.digits,
            draw_date: self.draw_date.clone(),
            lottery_name: self.lottery_name.clone(),
            prize: self.prize.clone(),
            price: self.price.clone(),
            is_active: self.is_active,
        };
        raffle.validate()?;
        Ok(raffle)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SetRaffleStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaffleResponse {
    pub id: i64,
    pub name: String,
    pub range_start: i32,
    pub range_end: i32,
    pub digits: i32,
    pub draw_date: String,
    pub lottery_name: String,
    pub prize: String,
    pub price: String,
    pub is_active: bool,
    /// Tickets in the range
    pub ticket_count: i64,
}

impl From<raffle_entity::Model> for RaffleResponse {
    fn from(m: raffle_entity::Model) -> Self {
        let ticket_count = m.ticket_count();
        Self {
            id: m.id,
            name: m.name,
            range_start: m.range_start,
            range_end: m.range_end,
            digits: m.digits,
            draw_date: m.draw_date,
            lottery_name: m.lottery_name,
            prize: m.prize,
            price: m.price,
            is_active: m.is_active,
            ticket_count,
        }
    }
}
