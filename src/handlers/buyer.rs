use crate::models::*;
use crate::services::ReportService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/buyers",
    tag = "buyer",
    params(
        ("search" = Option<String>, Query, description = "Name or number to look for"),
        ("status" = Option<PaymentStatusFilter>, Query, description = "all | paid | unpaid")
    ),
    responses(
        (status = 200, description = "Buyers across all raffles, by name", body = [BuyerSummaryResponse])
    )
)]
/// Buyers across all raffles, grouped by name and phone
pub async fn list_buyers(
    service: web::Data<ReportService>,
    query: web::Query<BuyerQuery>,
) -> Result<HttpResponse> {
    match service.global_buyers(&query).await {
        Ok(buyers) => {
            let data: Vec<BuyerSummaryResponse> = buyers.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn buyer_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/buyers", web::get().to(list_buyers));
}
