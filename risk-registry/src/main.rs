use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use risk_registry::{
    config::{Config, LoggingConfig},
    handlers, metrics, RiskStore,
};
use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();
    init_tracing(
        &config
            .as_ref()
            .map(|c| c.logging.clone())
            .unwrap_or_default(),
    );

    info!("Starting Risk Registry...");

    // Load configuration
    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    info!("Configuration loaded successfully");

    if let Err(e) = metrics::register_metrics(prometheus::default_registry()) {
        warn!("Failed to register metrics: {}", e);
    }

    // Shared by every worker for the lifetime of the process
    let store = web::Data::new(RiskStore::new());

    let server_config = config.server.clone();
    let http_requests = config.logging.http_requests;
    let cors_max_age = config.cors.max_age_seconds;

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Condition::new(
                http_requests,
                middleware::Logger::default(),
            ))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(cors_max_age),
            )
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .shutdown_timeout(server_config.shutdown_timeout_seconds)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
