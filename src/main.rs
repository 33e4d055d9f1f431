use tracing::info;

use newsdesk::feed::JobScheduler;
use newsdesk::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = newsdesk::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        newsdesk::logging::init_console_only(&config.logging.level);
    }

    info!("newsdesk - news aggregation backend");

    let db = match Database::connect(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = JobScheduler::new(db.clone(), config.ingest.clone()).start() {
        eprintln!("Failed to start scheduled jobs: {e}");
        std::process::exit(1);
    }

    let server = match WebServer::new(&config.server, db) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Invalid server configuration: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = server.run().await {
        eprintln!("Web server error: {e}");
        std::process::exit(1);
    }
}
