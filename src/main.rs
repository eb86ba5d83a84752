//! # Static HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: parsea la configuración, inicializa el
//! logging, arranca el servidor y bloquea hasta recibir SIGINT / SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use static_httpd::config::Config;
use static_httpd::logging;
use static_httpd::server::Server;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();

    logging::init(&config.log_level)?;
    config.log_summary();
    config.validate().map_err(anyhow::Error::msg)?;

    let mut server = Server::new(config);
    let shutdown = server.start().context("Error al iniciar servidor")?;

    #[cfg(unix)]
    let signals = static_httpd::server::SignalListener::install(shutdown.clone())
        .context("No se pudieron instalar los handlers de señales")?;
    #[cfg(not(unix))]
    let _ = shutdown;

    server.run()?;

    #[cfg(unix)]
    signals.close();

    info!("bye");
    Ok(())
}
