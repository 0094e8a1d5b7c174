//! Statistics ledger HTTP server binary

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use stats_ledger::{handlers, AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Statistics Ledger...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        window_seconds = config.ledger.window_seconds,
        "Configuration loaded successfully"
    );

    let state = AppState::new(&config).context("Failed to initialize application state")?;
    let state = web::Data::new(state);

    let (host, port) = config.bind_addr();
    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(config.server.workers)
    .bind((host, port))?
    .run()
    .await?;

    info!("Statistics Ledger stopped");
    Ok(())
}
