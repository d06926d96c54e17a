//! Backend entry-point: settings, adapters, HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use traveltrove::inbound::http::health::HealthState;
use traveltrove::inbound::http::session_config::{BuildMode, session_settings_from_env};
use traveltrove::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use traveltrove::settings::AppSettings;

use server::{ServerConfig, build_external_ports, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("loading settings: {err}"))?;
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&DefaultEnv::new(), mode)
        .wrap_err("loading session settings")?;
    let bind_addr = settings.bind_addr()?;

    let pool = match settings.database_url() {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("connected to PostgreSQL");
            Some(pool)
        }
        None => None,
    };

    let ports = build_external_ports(&settings, !mode.is_debug())
        .wrap_err("configuring outbound adapters")?;
    let config =
        ServerConfig::new(session, bind_addr, settings.body_limit_bytes()).with_db_pool(pool);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config, ports)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
