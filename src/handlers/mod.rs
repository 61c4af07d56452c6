pub mod buyer;
pub mod dashboard;
pub mod raffle;
pub mod sold_number;
pub mod update;

pub use buyer::buyer_config;
pub use dashboard::dashboard_config;
pub use raffle::raffle_config;
pub use sold_number::sold_number_config;
pub use update::update_config;

use actix_web::web;

/// Every `/api/v1` route
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(raffle_config)
        .configure(sold_number_config)
        .configure(buyer_config)
        .configure(dashboard_config)
        .configure(update_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdateConfig;
    use crate::database::create_memory_pool;
    use crate::external::{ManualInstaller, UpdateFeedClient};
    use crate::services::{RaffleService, ReportService, UpdateNotifier};
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn services() -> (RaffleService, ReportService, UpdateNotifier) {
        let raffle_service = RaffleService::new(create_memory_pool().await.unwrap());
        let report_service = ReportService::new(raffle_service.clone());
        let cfg = UpdateConfig {
            descriptor_url: "http://127.0.0.1:9/update.json".to_string(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let notifier = UpdateNotifier::new(
            UpdateFeedClient::new(&cfg).unwrap(),
            Arc::new(ManualInstaller),
            cfg,
        );
        (raffle_service, report_service, notifier)
    }

    macro_rules! app {
        ($raffles:expr, $reports:expr, $notifier:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($raffles.clone()))
                    .app_data(web::Data::new($reports.clone()))
                    .app_data(web::Data::new($notifier.clone()))
                    .service(web::scope("/api/v1").configure(api_config)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_sell_and_report() {
        let (raffles, reports, notifier) = services().await;
        let app = app!(raffles, reports, notifier);

        let req = test::TestRequest::post()
            .uri("/api/v1/raffles")
            .set_json(json!({
                "name": "Navidad",
                "range_start": "00",
                "range_end": "99",
                "price": "2000"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["digits"], 2);
        let raffle_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/raffles/{raffle_id}/sales"))
            .set_json(json!({
                "numbers": ["07", "13"],
                "buyer_name": "Ana",
                "buyer_phone": "555"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/raffles/{raffle_id}/buyers"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["name"], "Ana");

        let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["revenue"]["gross"], 4000.0);
        assert_eq!(body["data"]["revenue"]["net"], 0.0);
    }

    #[actix_web::test]
    async fn test_sale_conflict_is_409() {
        let (raffles, reports, notifier) = services().await;
        let app = app!(raffles, reports, notifier);

        let req = test::TestRequest::post()
            .uri("/api/v1/raffles")
            .set_json(json!({ "name": "Rifa", "range_start": "0", "range_end": "9" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let raffle_id = body["data"]["id"].as_i64().unwrap();

        let sale = json!({ "numbers": ["3"], "buyer_name": "Ana", "buyer_phone": "" });
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/raffles/{raffle_id}/sales"))
            .set_json(&sale)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/raffles/{raffle_id}/sales"))
            .set_json(&sale)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "ALREADY_SOLD");
    }

    #[actix_web::test]
    async fn test_invalid_raffle_and_missing_ids() {
        let (raffles, reports, notifier) = services().await;
        let app = app!(raffles, reports, notifier);

        let req = test::TestRequest::post()
            .uri("/api/v1/raffles")
            .set_json(json!({ "name": " ", "range_start": "0", "range_end": "9" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/v1/raffles")
            .set_json(json!({
                "name": "Rifa",
                "range_start": "-2147483648",
                "range_end": "2147483647"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/v1/raffles/42").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/v1/raffles/42").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/v1/sold-numbers/42").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_changes_reports_newer_revision() {
        let (raffles, reports, notifier) = services().await;
        let app = app!(raffles, reports, notifier);

        let req = test::TestRequest::get()
            .uri("/api/v1/changes?since=0&timeout_secs=0")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["changed"], false);

        let req = test::TestRequest::post()
            .uri("/api/v1/raffles")
            .set_json(json!({ "name": "Rifa", "range_start": "0", "range_end": "9" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/changes?since=0&timeout_secs=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["changed"], true);
        assert_eq!(body["data"]["revision"], 1);
    }

    #[actix_web::test]
    async fn test_download_without_url_does_nothing() {
        let (raffles, reports, notifier) = services().await;
        let app = app!(raffles, reports, notifier);

        let req = test::TestRequest::post()
            .uri("/api/v1/updates/download")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["started"], false);

        let req = test::TestRequest::get().uri("/api/v1/updates").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["downloading"], false);
    }
}
