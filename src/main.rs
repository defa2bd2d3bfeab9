use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matchday::auth::JwtVerifier;
use matchday::config::Settings;
use matchday::core::PairingEngine;
use matchday::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use matchday::models::ScoringRules;
use matchday::routes::{self, AppState};
use matchday::services::{MatchGenerator, MatchStore, MemoryStore, PostgresClient};

fn startup_error(what: &str, e: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", what, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    // Initialize logging; LOG_LEVEL and LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Matchday service...");
    info!("Configuration loaded successfully");

    let store: Arc<dyn MatchStore> = if settings.database.is_memory() {
        info!("Using in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let postgres = PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

        info!(
            "PostgreSQL client initialized (max: {} connections)",
            settings.database.max_connections.unwrap_or(10)
        );
        Arc::new(postgres)
    };

    let rules = ScoringRules::from(&settings.scoring);
    let generator = MatchGenerator::new(store.clone(), PairingEngine::new(rules));

    info!("Pairing engine initialized with rules: {:?}", rules);

    let app_state = AppState {
        store,
        generator,
        auth: JwtVerifier::from_settings(&settings.auth),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
