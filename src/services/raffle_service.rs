use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::entities::{raffle_entity as raffles, sold_number_entity as sold_numbers};
use crate::error::{AppError, AppResult};
use crate::models::NewRaffle;
use crate::services::{ChangeFeed, LiveQuery};
use crate::utils::is_valid_ticket_number;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Rows per statement when a batch is split up; keeps every statement well
/// under SQLite's bound-variable limit.
const STATEMENT_CHUNK: usize = 500;

/// Store access for raffles and sold numbers.
///
/// Input validation is the caller's job; this layer only guards store
/// integrity (cascades, one sale per number) and announces every committed
/// change on its [`ChangeFeed`].
///
/// Writes go through `write_lock`: SQLite allows one writer at a time, and a
/// deferred transaction on a second pooled connection fails with "database is
/// locked" instead of waiting for the first one.
#[derive(Clone)]
pub struct RaffleService {
    pool: DatabaseConnection,
    feed: ChangeFeed,
    write_lock: Arc<Mutex<()>>,
}

impl RaffleService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn revision(&self) -> u64 {
        self.feed.revision()
    }

    pub async fn wait_for_change(&self, since: u64, timeout: Duration) -> u64 {
        self.feed.wait_for_change(since, timeout).await
    }

    // -----------------------------
    // Reads
    // -----------------------------

    /// All raffles, newest first
    pub async fn list_raffles(&self) -> AppResult<Vec<raffles::Model>> {
        let list = raffles::Entity::find()
            .order_by_desc(raffles::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn find_raffle(&self, id: i64) -> AppResult<Option<raffles::Model>> {
        Ok(raffles::Entity::find_by_id(id).one(&self.pool).await?)
    }

    /// Like [`find_raffle`](Self::find_raffle) but a missing raffle is an error
    pub async fn get_raffle(&self, id: i64) -> AppResult<raffles::Model> {
        self.find_raffle(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Raffle {id} not found")))
    }

    pub async fn list_all_sold_numbers(&self) -> AppResult<Vec<sold_numbers::Model>> {
        let list = sold_numbers::Entity::find()
            .order_by_asc(sold_numbers::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn list_sold_numbers(&self, raffle_id: i64) -> AppResult<Vec<sold_numbers::Model>> {
        let list = sold_numbers::Entity::find()
            .filter(sold_numbers::Column::RaffleId.eq(raffle_id))
            .order_by_asc(sold_numbers::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn find_sold_number(&self, id: i64) -> AppResult<Option<sold_numbers::Model>> {
        Ok(sold_numbers::Entity::find_by_id(id).one(&self.pool).await?)
    }

    // -----------------------------
    // Live collections
    // -----------------------------

    pub fn watch_raffles(&self) -> LiveQuery<raffles::Model> {
        let service = self.clone();
        LiveQuery::new(self.feed.subscribe(), move || {
            let service = service.clone();
            async move { service.list_raffles().await }
        })
    }

    pub fn watch_all_sold_numbers(&self) -> LiveQuery<sold_numbers::Model> {
        let service = self.clone();
        LiveQuery::new(self.feed.subscribe(), move || {
            let service = service.clone();
            async move { service.list_all_sold_numbers().await }
        })
    }

    pub fn watch_sold_numbers(&self, raffle_id: i64) -> LiveQuery<sold_numbers::Model> {
        let service = self.clone();
        LiveQuery::new(self.feed.subscribe(), move || {
            let service = service.clone();
            async move { service.list_sold_numbers(raffle_id).await }
        })
    }

    // -----------------------------
    // Raffle mutations
    // -----------------------------

    pub async fn create_raffle(&self, raffle: NewRaffle) -> AppResult<raffles::Model> {
        let _guard = self.write_lock.lock().await;
        let created = raffles::ActiveModel {
            name: Set(raffle.name),
            range_start: Set(raffle.range_start),
            range_end: Set(raffle.range_end),
            digits: Set(raffle.digits),
            draw_date: Set(raffle.draw_date),
            lottery_name: Set(raffle.lottery_name),
            prize: Set(raffle.prize),
            price: Set(raffle.price),
            is_active: Set(raffle.is_active),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.feed.publish();
        log::info!("Created raffle {} ({})", created.id, created.name);
        Ok(created)
    }

    /// Full replacement of every raffle field.
    ///
    /// Once numbers are sold, the new range and padding must still contain
    /// every sold label exactly as it was stored.
    pub async fn update_raffle(&self, id: i64, raffle: NewRaffle) -> AppResult<raffles::Model> {
        let _guard = self.write_lock.lock().await;
        let txn = self.pool.begin().await?;

        let existing = raffles::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Raffle {id} not found")))?;

        let replaced = raffles::Model {
            range_start: raffle.range_start,
            range_end: raffle.range_end,
            digits: raffle.digits,
            ..existing.clone()
        };
        let stranded: Vec<String> = sold_numbers::Entity::find()
            .filter(sold_numbers::Column::RaffleId.eq(id))
            .order_by_asc(sold_numbers::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.number)
            .filter(|number| !is_valid_ticket_number(&replaced, number))
            .collect();
        if !stranded.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Sold numbers {} do not fit the new range",
                stranded.join(", ")
            )));
        }

        let mut am = existing.into_active_model();
        am.name = Set(raffle.name);
        am.range_start = Set(raffle.range_start);
        am.range_end = Set(raffle.range_end);
        am.digits = Set(raffle.digits);
        am.draw_date = Set(raffle.draw_date);
        am.lottery_name = Set(raffle.lottery_name);
        am.prize = Set(raffle.prize);
        am.price = Set(raffle.price);
        am.is_active = Set(raffle.is_active);
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        self.feed.publish();
        Ok(updated)
    }

    pub async fn set_raffle_active(&self, id: i64, is_active: bool) -> AppResult<raffles::Model> {
        let _guard = self.write_lock.lock().await;
        let existing = self.get_raffle(id).await?;

        let mut am = existing.into_active_model();
        am.is_active = Set(is_active);
        let updated = am.update(&self.pool).await?;

        self.feed.publish();
        log::info!("Raffle {id} is now {}", if is_active { "active" } else { "inactive" });
        Ok(updated)
    }

    /// Deletes the raffle's sold numbers, then the raffle, as one transaction.
    /// Returns `false` when the raffle did not exist.
    pub async fn delete_raffle(&self, id: i64) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let txn = self.pool.begin().await?;

        let tickets = sold_numbers::Entity::delete_many()
            .filter(sold_numbers::Column::RaffleId.eq(id))
            .exec(&txn)
            .await?;
        let raffle = raffles::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let deleted = raffle.rows_affected > 0;
        if deleted || tickets.rows_affected > 0 {
            self.feed.publish();
        }
        log::info!(
            "Deleted raffle {id} with {} sold numbers",
            tickets.rows_affected
        );
        Ok(deleted)
    }

    // -----------------------------
    // Sales
    // -----------------------------

    /// Records one sale: every number goes to the same buyer, unpaid.
    ///
    /// All-or-nothing: numbers outside the raffle or repeated in the request
    /// are a validation error, and if any number is already sold the whole
    /// batch is rejected with [`AppError::AlreadySold`]. The unique index on
    /// (raffle_id, number) backs this up against concurrent sales.
    pub async fn sell_tickets(
        &self,
        raffle_id: i64,
        numbers: &[String],
        buyer_name: &str,
        buyer_phone: &str,
    ) -> AppResult<Vec<sold_numbers::Model>> {
        if numbers.is_empty() {
            return Err(AppError::ValidationError("No numbers to sell".into()));
        }

        let _guard = self.write_lock.lock().await;
        let txn = self.pool.begin().await?;

        let raffle = raffles::Entity::find_by_id(raffle_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Raffle {raffle_id} not found")))?;

        let mut seen = HashSet::new();
        for number in numbers {
            if !is_valid_ticket_number(&raffle, number) {
                return Err(AppError::ValidationError(format!(
                    "Number {number} is not part of raffle {raffle_id}"
                )));
            }
            if !seen.insert(number.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Number {number} was selected twice"
                )));
            }
        }

        let mut taken = Vec::new();
        for chunk in numbers.chunks(STATEMENT_CHUNK) {
            let found = sold_numbers::Entity::find()
                .filter(sold_numbers::Column::RaffleId.eq(raffle_id))
                .filter(sold_numbers::Column::Number.is_in(chunk.iter().cloned()))
                .order_by_asc(sold_numbers::Column::Id)
                .all(&txn)
                .await?;
            taken.extend(found.into_iter().map(|s| s.number));
        }
        if !taken.is_empty() {
            return Err(AppError::AlreadySold(taken));
        }

        for chunk in numbers.chunks(STATEMENT_CHUNK) {
            let rows = chunk.iter().map(|number| sold_numbers::ActiveModel {
                raffle_id: Set(raffle_id),
                number: Set(number.clone()),
                buyer_name: Set(buyer_name.to_string()),
                buyer_phone: Set(buyer_phone.to_string()),
                is_paid: Set(false),
                ..Default::default()
            });
            sold_numbers::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(|e| AppError::from_sale_conflict(e, numbers))?;
        }

        let created: Vec<sold_numbers::Model> = sold_numbers::Entity::find()
            .filter(sold_numbers::Column::RaffleId.eq(raffle_id))
            .order_by_asc(sold_numbers::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .filter(|s| seen.contains(s.number.as_str()))
            .collect();

        txn.commit()
            .await
            .map_err(|e| AppError::from_sale_conflict(e, numbers))?;

        self.feed.publish();
        log::info!(
            "Sold {} numbers of raffle {raffle_id} to {buyer_name}",
            created.len()
        );
        Ok(created)
    }

    // -----------------------------
    // Sold number mutations
    // -----------------------------

    /// Replaces buyer fields and payment flag of one sold number
    pub async fn update_sold_number(
        &self,
        id: i64,
        buyer_name: &str,
        buyer_phone: &str,
        is_paid: bool,
    ) -> AppResult<sold_numbers::Model> {
        let _guard = self.write_lock.lock().await;
        let existing = self
            .find_sold_number(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sold number {id} not found")))?;

        let mut am = existing.into_active_model();
        am.buyer_name = Set(buyer_name.to_string());
        am.buyer_phone = Set(buyer_phone.to_string());
        am.is_paid = Set(is_paid);
        let updated = am.update(&self.pool).await?;

        self.feed.publish();
        Ok(updated)
    }

    /// Marks the given numbers as paid in one transaction. Payment is one-way:
    /// numbers already paid are left alone and nothing is ever set unpaid.
    pub async fn confirm_payment(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let txn = self.pool.begin().await?;
        let mut affected = 0;
        for chunk in ids.chunks(STATEMENT_CHUNK) {
            let result = sold_numbers::Entity::update_many()
                .col_expr(sold_numbers::Column::IsPaid, Expr::value(true))
                .filter(sold_numbers::Column::Id.is_in(chunk.iter().copied()))
                .filter(sold_numbers::Column::IsPaid.eq(false))
                .exec(&txn)
                .await?;
            affected += result.rows_affected;
        }
        txn.commit().await?;

        if affected > 0 {
            self.feed.publish();
        }
        Ok(affected)
    }

    /// Returns `false` when the number did not exist
    pub async fn delete_sold_number(&self, id: i64) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let result = sold_numbers::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;

        if result.rows_affected > 0 {
            self.feed.publish();
        }
        Ok(result.rows_affected > 0)
    }

    /// Removes a buyer's whole set of numbers in one transaction
    pub async fn delete_sold_numbers(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let txn = self.pool.begin().await?;
        let mut affected = 0;
        for chunk in ids.chunks(STATEMENT_CHUNK) {
            let result = sold_numbers::Entity::delete_many()
                .filter(sold_numbers::Column::Id.is_in(chunk.iter().copied()))
                .exec(&txn)
                .await?;
            affected += result.rows_affected;
        }
        txn.commit().await?;

        if affected > 0 {
            self.feed.publish();
        }
        Ok(affected)
    }
}
