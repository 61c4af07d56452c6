use crate::error::AppError;
use crate::models::*;
use crate::services::RaffleService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    put,
    path = "/sold-numbers/{id}",
    tag = "sold_number",
    params(("id" = i64, Path, description = "Sold number id")),
    request_body = UpdateSoldNumberRequest,
    responses(
        (status = 200, description = "Sold number updated", body = SoldNumberResponse),
        (status = 400, description = "Missing buyer name"),
        (status = 404, description = "Sold number does not exist")
    )
)]
/// Edits buyer data and payment flag of one sold number
pub async fn update_sold_number(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
    request: web::Json<UpdateSoldNumberRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = request.validate() {
        return Ok(e.error_response());
    }

    match service
        .update_sold_number(
            path.into_inner(),
            request.buyer_name.trim(),
            request.buyer_phone.trim(),
            request.is_paid,
        )
        .await
    {
        Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SoldNumberResponse::from(updated),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/sold-numbers/{id}",
    tag = "sold_number",
    params(("id" = i64, Path, description = "Sold number id")),
    responses(
        (status = 200, description = "Sold number released"),
        (status = 404, description = "Sold number does not exist")
    )
)]
/// Releases one sold number
pub async fn delete_sold_number(
    service: web::Data<RaffleService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match service.delete_sold_number(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success(id))),
        Ok(false) => {
            Ok(AppError::NotFound(format!("Sold number {id} not found")).error_response())
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sold-numbers/confirm-payment",
    tag = "sold_number",
    request_body = SoldNumberIdsRequest,
    responses(
        (status = 200, description = "Numbers marked as paid", body = BatchResult),
        (status = 400, description = "No ids given")
    )
)]
/// Marks a buyer's numbers as paid. Irreversible.
pub async fn confirm_payment(
    service: web::Data<RaffleService>,
    request: web::Json<SoldNumberIdsRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = request.validate() {
        return Ok(e.error_response());
    }

    match service.confirm_payment(&request.ids).await {
        Ok(affected) => Ok(HttpResponse::Ok().json(ApiResponse::success(BatchResult { affected }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sold-numbers/delete-batch",
    tag = "sold_number",
    request_body = SoldNumberIdsRequest,
    responses(
        (status = 200, description = "Numbers released", body = BatchResult),
        (status = 400, description = "No ids given")
    )
)]
/// Removes a buyer together with all of their numbers
pub async fn delete_sold_numbers(
    service: web::Data<RaffleService>,
    request: web::Json<SoldNumberIdsRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = request.validate() {
        return Ok(e.error_response());
    }

    match service.delete_sold_numbers(&request.ids).await {
        Ok(affected) => Ok(HttpResponse::Ok().json(ApiResponse::success(BatchResult { affected }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn sold_number_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sold-numbers")
            .route("/confirm-payment", web::post().to(confirm_payment))
            .route("/delete-batch", web::post().to(delete_sold_numbers))
            .route("/{id}", web::put().to(update_sold_number))
            .route("/{id}", web::delete().to(delete_sold_number)),
    );
}
