use crate::error::AppResult;
use crate::models::{
    BuyerQuery, BuyerScope, BuyerSummary, DashboardResponse, RaffleBoardResponse, compute_revenue,
    group_by_buyer, raffle_payment_status, top_buyers_by_volume,
};
use crate::services::RaffleService;

/// Buyers shown in the dashboard's loyal-clients panel
pub const TOP_BUYERS_LIMIT: usize = 10;

/// Read-only views built from the store: dashboard, buyer lists, ticket grid
#[derive(Clone)]
pub struct ReportService {
    raffle_service: RaffleService,
}

impl ReportService {
    pub fn new(raffle_service: RaffleService) -> Self {
        Self { raffle_service }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let raffles = self.raffle_service.list_raffles().await?;
        let sold = self.raffle_service.list_all_sold_numbers().await?;

        let revenue = compute_revenue(&raffles, &sold);
        Ok(DashboardResponse {
            revenue: revenue.into(),
            top_buyers: top_buyers_by_volume(&sold, TOP_BUYERS_LIMIT),
            payment_status: raffle_payment_status(&raffles, &sold),
            raffle_count: raffles.len(),
            active_raffle_count: raffles.iter().filter(|r| r.is_active).count(),
            sold_count: sold.len(),
        })
    }

    /// Buyers of one raffle, in the order they first bought
    pub async fn raffle_buyers(
        &self,
        raffle_id: i64,
        query: &BuyerQuery,
    ) -> AppResult<Vec<BuyerSummary>> {
        // 404 for a stale raffle id rather than an empty list
        self.raffle_service.get_raffle(raffle_id).await?;
        let sold = self.raffle_service.list_sold_numbers(raffle_id).await?;
        Ok(query.apply(group_by_buyer(&sold, BuyerScope::Raffle)))
    }

    /// Buyers across every raffle, sorted by name
    pub async fn global_buyers(&self, query: &BuyerQuery) -> AppResult<Vec<BuyerSummary>> {
        let sold = self.raffle_service.list_all_sold_numbers().await?;
        Ok(query.apply(group_by_buyer(&sold, BuyerScope::Global)))
    }

    pub async fn raffle_board(&self, raffle_id: i64) -> AppResult<RaffleBoardResponse> {
        let raffle = self.raffle_service.get_raffle(raffle_id).await?;
        let sold = self.raffle_service.list_sold_numbers(raffle_id).await?;
        Ok(RaffleBoardResponse::build(raffle, &sold))
    }
}
