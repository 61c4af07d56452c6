use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use rifas_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{UpdateFeedClient, installer_from_config},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let raffle_service = RaffleService::new(pool.clone());
    let report_service = ReportService::new(raffle_service.clone());

    let update_feed =
        UpdateFeedClient::new(&config.update).context("Failed to build update client")?;
    let update_notifier = UpdateNotifier::new(
        update_feed,
        installer_from_config(&config.update),
        config.update.clone(),
    );

    tasks::spawn_all(update_notifier.clone(), &config.update);

    let bind = (config.server.host.clone(), config.server.port);
    log::info!("Starting server on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(raffle_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(update_notifier.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
