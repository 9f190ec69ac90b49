//! Backend entry-point: loads settings and serves the booking REST API.

mod server;

use std::sync::Arc;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use venue_backend::domain::ActorEmail;
use venue_backend::domain::ports::ConfiguredLoginService;
use venue_backend::inbound::http::health::HealthState;
use venue_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{AppSettings, ServerConfig, SettingsError, key_fingerprint, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await?;
    Ok(())
}

async fn build_server_config(settings: &AppSettings) -> Result<ServerConfig> {
    let key_path = settings.session_key_file();
    let allow_ephemeral = cfg!(debug_assertions) || settings.allow_ephemeral_session_key;
    let key = load_session_key(&key_path, allow_ephemeral)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr()?,
    );

    match settings.database_url.as_deref() {
        Some(url) => {
            run_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_pool_size()?))
                .await
                .wrap_err("failed to build database pool")?;
            info!("bookings stored in PostgreSQL");
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; bookings are kept in memory"),
    }

    match settings.admin_credentials()? {
        Some((email, password)) => {
            let admin = ActorEmail::new(&email).map_err(|err| SettingsError::AdminEmail {
                message: err.to_string(),
            })?;
            config = config.with_login(Arc::new(ConfiguredLoginService::new(admin, &password)));
        }
        None => warn!("no admin credentials configured; using the development login"),
    }

    Ok(config)
}
