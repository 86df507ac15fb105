//! Backend entry-point: loads settings, prepares the database and serves the
//! catalog API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use holocron::inbound::http::health::HealthState;
use holocron::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use holocron::outbound::security::{BuildMode, signing_secret_from_env};
use holocron::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let database_url = settings
        .database_url()
        .map_err(std::io::Error::other)?
        .to_owned();

    let secret = signing_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    info!(applied, "database schema up to date");

    let db_pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create database pool: {e}")))?;

    let config =
        ServerConfig::from_settings(&settings, db_pool, secret).map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
