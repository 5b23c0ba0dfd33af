use config::ConfigError;
use std::time::Duration;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub uri: String,
    pub database_name: String,
    pub connect_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// JWT authentication settings
///
/// An empty `secret` is accepted here; signing refuses it at call time.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (default 6 hours)
    pub refresh_token_expiry: i64,  // seconds (default 24 hours)
    pub issuer: String,
}

/// Load settings from `configuration.yaml` (optional), then `APP_*`
/// environment variables (`APP_JWT__SECRET`, `APP_DATABASE__URI`, ...).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8080)?
        .set_default("application.shutdown_timeout_secs", 5)?
        .set_default("database.uri", "mongodb://localhost:27017")?
        .set_default("database.database_name", "restaurant")?
        .set_default("database.connect_timeout_secs", 10)?
        .set_default("jwt.secret", "")?
        .set_default("jwt.access_token_expiry", 6 * 60 * 60)?
        .set_default("jwt.refresh_token_expiry", 24 * 60 * 60)?
        .set_default("jwt.issuer", "restaurant-api")?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
