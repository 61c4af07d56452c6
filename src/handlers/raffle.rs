use crate::error::AppError;
use crate::models::*;
use crate::services::{RaffleService, ReportService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/raffles",
    tag = "raffle",
    responses(
        (status = 200, description = "All raffles, newest first", body = [RaffleResponse])
    )
)]
/// All raffles, newest first
pub async fn list_raffles(service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match service.list_raffles().await {
        Ok(list) => {
            let data: Vec<RaffleResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffles",
    tag = "raffle",
    request_body = CreateRaffleRequest,
    responses(
        (status = 201, description = "Raffle created", body = RaffleResponse),
        (status = 400, description = "Blank name, non-numeric range or end < start")
    )
)]
/// Creates a raffle; digits default to the width of the typed range
pub async fn create_raffle(
    service: web::Data<RaffleService>,
    request: web::Json<CreateRaffleRequest>,
) -> Result<HttpResponse> {
    let raffle = match request.validate() {
        Ok(raffle) => raffle,
        Err(e) => return Ok(e.error_response()),
    };

    match service.create_raffle(raffle).await {
        Ok(created) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(RaffleResponse::from(created))))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    responses(
        (status = 200, description = "Raffle", body = RaffleResponse),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// One raffle by id
pub async fn get_raffle(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match service.find_raffle(id).await {
        Ok(Some(raffle)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(RaffleResponse::from(raffle))))
        }
        Ok(None) => Ok(AppError::NotFound(format!("Raffle {id} not found")).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/raffles/{id}",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    request_body = UpdateRaffleRequest,
    responses(
        (status = 200, description = "Raffle replaced", body = RaffleResponse),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// Replaces every field of a raffle; sold numbers must still fit the new range
pub async fn update_raffle(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
    request: web::Json<UpdateRaffleRequest>,
) -> Result<HttpResponse> {
    let raffle = match request.validate() {
        Ok(raffle) => raffle,
        Err(e) => return Ok(e.error_response()),
    };

    match service.update_raffle(path.into_inner(), raffle).await {
        Ok(updated) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(RaffleResponse::from(updated))))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/raffles/{id}/status",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    request_body = SetRaffleStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = RaffleResponse),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// Turns a raffle active or inactive
pub async fn set_raffle_status(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
    request: web::Json<SetRaffleStatusRequest>,
) -> Result<HttpResponse> {
    match service
        .set_raffle_active(path.into_inner(), request.is_active)
        .await
    {
        Ok(updated) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(RaffleResponse::from(updated))))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/raffles/{id}",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    responses(
        (status = 200, description = "Raffle and its sold numbers deleted"),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// Deletes a raffle together with its sold numbers
pub async fn delete_raffle(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match service.delete_raffle(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            id,
            "Raffle deleted",
        ))),
        Ok(false) => Ok(AppError::NotFound(format!("Raffle {id} not found")).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}/board",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    responses(
        (status = 200, description = "Ticket grid with sale state", body = RaffleBoardResponse),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// Every ticket of the raffle with its sale and payment state
pub async fn get_board(
    service: web::Data<ReportService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.raffle_board(path.into_inner()).await {
        Ok(board) => Ok(HttpResponse::Ok().json(ApiResponse::success(board))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}/sold-numbers",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    responses(
        (status = 200, description = "Sold numbers of the raffle", body = [SoldNumberResponse])
    )
)]
/// Sold numbers of one raffle
pub async fn list_sold_numbers(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.list_sold_numbers(path.into_inner()).await {
        Ok(list) => {
            let data: Vec<SoldNumberResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffles/{id}/sales",
    tag = "raffle",
    params(("id" = i64, Path, description = "Raffle id")),
    request_body = SellNumbersRequest,
    responses(
        (status = 201, description = "Numbers sold", body = [SoldNumberResponse]),
        (status = 400, description = "Missing buyer, no numbers or numbers outside the raffle"),
        (status = 404, description = "Raffle does not exist"),
        (status = 409, description = "Some numbers were already sold; nothing was recorded")
    )
)]
/// Sells one or more numbers to a single buyer, all or nothing
pub async fn sell_numbers(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
    request: web::Json<SellNumbersRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = request.validate() {
        return Ok(e.error_response());
    }

    let request = request.into_inner();
    match service
        .sell_tickets(
            path.into_inner(),
            &request.numbers,
            request.buyer_name.trim(),
            request.buyer_phone.trim(),
        )
        .await
    {
        Ok(sold) => {
            let data: Vec<SoldNumberResponse> = sold.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Created().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/raffles/{id}/buyers",
    tag = "raffle",
    params(
        ("id" = i64, Path, description = "Raffle id"),
        ("search" = Option<String>, Query, description = "Name or number to look for"),
        ("status" = Option<PaymentStatusFilter>, Query, description = "all | paid | unpaid")
    ),
    responses(
        (status = 200, description = "Buyers of the raffle in order of first purchase", body = [BuyerSummaryResponse]),
        (status = 404, description = "Raffle does not exist")
    )
)]
/// Buyers of one raffle, filtered by name/number and payment status
pub async fn list_raffle_buyers(
    service: web::Data<ReportService>,
    path: web::Path<i64>,
    query: web::Query<BuyerQuery>,
) -> Result<HttpResponse> {
    match service.raffle_buyers(path.into_inner(), &query).await {
        Ok(buyers) => {
            let data: Vec<BuyerSummaryResponse> = buyers.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(data)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn raffle_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/raffles")
            .route("", web::get().to(list_raffles))
            .route("", web::post().to(create_raffle))
            .route("/{id}", web::get().to(get_raffle))
            .route("/{id}", web::put().to(update_raffle))
            .route("/{id}", web::delete().to(delete_raffle))
            .route("/{id}/status", web::patch().to(set_raffle_status))
            .route("/{id}/board", web::get().to(get_board))
            .route("/{id}/sold-numbers", web::get().to(list_sold_numbers))
            .route("/{id}/sales", web::post().to(sell_numbers))
            .route("/{id}/buyers", web::get().to(list_raffle_buyers)),
    );
}
