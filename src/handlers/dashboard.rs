use crate::models::*;
use crate::services::{RaffleService, ReportService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use std::time::Duration;

const MAX_POLL_SECS: u64 = 60;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Revenue, top buyers and payment status of active raffles", body = DashboardResponse)
    )
)]
/// Revenue totals, loyal buyers and payment status per active raffle
pub async fn get_dashboard(service: web::Data<ReportService>) -> Result<HttpResponse> {
    match service.dashboard().await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/changes",
    tag = "dashboard",
    params(
        ("since" = Option<u64>, Query, description = "Last revision seen by the client"),
        ("timeout_secs" = Option<u64>, Query, description = "How long to wait (max 60, default 30)")
    ),
    responses(
        (status = 200, description = "Current store revision", body = ChangesResponse)
    )
)]
/// Long-poll: answers as soon as the store moves past `since`, or with the
/// unchanged revision when the wait times out.
pub async fn poll_changes(
    service: web::Data<RaffleService>,
    query: web::Query<ChangesQuery>,
) -> Result<HttpResponse> {
    let wait = query.timeout_secs.unwrap_or(30).min(MAX_POLL_SECS);
    let revision = service
        .wait_for_change(query.since, Duration::from_secs(wait))
        .await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ChangesResponse {
        revision,
        changed: revision > query.since,
    })))
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard))
        .route("/changes", web::get().to(poll_changes));
}
