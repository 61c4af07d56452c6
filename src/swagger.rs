use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::raffle::list_raffles,
        handlers::raffle::create_raffle,
        handlers::raffle::get_raffle,
        handlers::raffle::update_raffle,
        handlers::raffle::set_raffle_status,
        handlers::raffle::delete_raffle,
        handlers::raffle::get_board,
        handlers::raffle::list_sold_numbers,
        handlers::raffle::sell_numbers,
        handlers::raffle::list_raffle_buyers,
        handlers::sold_number::update_sold_number,
        handlers::sold_number::delete_sold_number,
        handlers::sold_number::confirm_payment,
        handlers::sold_number::delete_sold_numbers,
        handlers::buyer::list_buyers,
        handlers::dashboard::get_dashboard,
        handlers::dashboard::poll_changes,
        handlers::update::get_update_state,
        handlers::update::check_for_updates,
        handlers::update::download_update,
    ),
    components(
        schemas(
            CreateRaffleRequest,
            UpdateRaffleRequest,
            SetRaffleStatusRequest,
            RaffleResponse,
            SellNumbersRequest,
            UpdateSoldNumberRequest,
            SoldNumberIdsRequest,
            SoldNumberResponse,
            BatchResult,
            PaymentStatusFilter,
            BuyerQuery,
            BuyerSummaryResponse,
            TicketCell,
            RaffleBoardResponse,
            RevenueResponse,
            TopBuyer,
            RafflePaymentStatus,
            DashboardResponse,
            ChangesQuery,
            ChangesResponse,
            AppUpdate,
            UpdateState,
            DownloadUpdateRequest,
            DownloadUpdateResponse,
        )
    ),
    tags(
        (name = "raffle", description = "Raffles, their ticket grid and sales"),
        (name = "sold_number", description = "Edit, pay and release sold numbers"),
        (name = "buyer", description = "Buyers across all raffles"),
        (name = "dashboard", description = "Revenue summary and change notifications"),
        (name = "update", description = "Application update notifier"),
    ),
    info(
        title = "Rifas Backend API",
        version = "1.0.0",
        description = "Raffle ticket tracking REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
