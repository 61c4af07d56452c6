use crate::models::*;
use crate::services::UpdateNotifier;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/updates",
    tag = "update",
    responses(
        (status = 200, description = "Current update state", body = UpdateState)
    )
)]
/// Current update state
pub async fn get_update_state(notifier: web::Data<UpdateNotifier>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(notifier.state())))
}

#[utoipa::path(
    post,
    path = "/updates/check",
    tag = "update",
    responses(
        (status = 200, description = "Update state after polling the descriptor; failures read as no update", body = UpdateState)
    )
)]
/// Polls the release descriptor now
pub async fn check_for_updates(notifier: web::Data<UpdateNotifier>) -> Result<HttpResponse> {
    notifier.check_for_updates().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(notifier.state())))
}

#[utoipa::path(
    post,
    path = "/updates/download",
    tag = "update",
    request_body = DownloadUpdateRequest,
    responses(
        (status = 202, description = "Download started", body = DownloadUpdateResponse),
        (status = 200, description = "Nothing started: a download is running or no url is known", body = DownloadUpdateResponse)
    )
)]
/// Starts downloading the update package unless one is already downloading
pub async fn download_update(
    notifier: web::Data<UpdateNotifier>,
    request: Option<web::Json<DownloadUpdateRequest>>,
) -> Result<HttpResponse> {
    let url = request
        .and_then(|r| r.into_inner().url)
        .filter(|u| !u.trim().is_empty())
        .or_else(|| notifier.state().available.map(|u| u.update_url));

    let started = match url {
        Some(url) => notifier.download_update(&url),
        None => {
            log::debug!("Download requested with no known update url");
            false
        }
    };

    let body = ApiResponse::success(DownloadUpdateResponse { started });
    if started {
        Ok(HttpResponse::Accepted().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

pub fn update_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/updates")
            .route("", web::get().to(get_update_state))
            .route("/check", web::post().to(check_for_updates))
            .route("/download", web::post().to(download_update)),
    );
}
