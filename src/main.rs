use std::net::TcpListener;
use std::time::Duration;

use restaurant_api::auth::{TokenIssuer, TokenValidator};
use restaurant_api::configuration::get_configuration;
use restaurant_api::repository::mongo;
use restaurant_api::startup::run;
use restaurant_api::telemetry::init_telemetry;

fn startup_error(kind: std::io::ErrorKind, message: &str) -> std::io::Error {
    std::io::Error::new(kind, message.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = get_configuration().map_err(|e| {
        tracing::error!(error = %e, "Failed to read configuration");
        startup_error(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    let issuer = TokenIssuer::new(&configuration.jwt).map_err(|e| {
        tracing::error!(error = %e, "Invalid JWT settings");
        startup_error(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;
    let validator = TokenValidator::new(&configuration.jwt);
    if configuration.jwt.secret.is_empty() {
        tracing::warn!("jwt.secret is empty; signup and login will fail until it is set");
    }

    tracing::info!(database = %configuration.database.database_name, "Connecting to MongoDB");
    let db = mongo::connect(&configuration.database).await.map_err(|e| {
        tracing::error!(error = %e, "Invalid database settings");
        startup_error(std::io::ErrorKind::InvalidInput, "Database configuration error")
    })?;

    let repositories = mongo::repositories(&db);
    let ping_deadline = configuration.database.connect_timeout() + Duration::from_secs(1);
    match tokio::time::timeout(ping_deadline, repositories.health.ping()).await {
        Ok(Ok(())) => tracing::info!("Database reachable"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Database ping failed, continuing"),
        Err(_) => tracing::warn!("Database ping timed out, continuing"),
    }

    if let Err(e) = mongo::ensure_indexes(&db).await {
        tracing::warn!(error = %e, "Could not create user indexes");
    }

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!(address = %address, "Server listening");

    let server = run(
        listener,
        repositories,
        issuer,
        validator,
        configuration.application.shutdown_timeout_secs,
    )?;
    server.await
}
