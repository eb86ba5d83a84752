//! # Logging
//! src/logging.rs
//!
//! Instala el subscriber de `tracing`. `RUST_LOG` tiene prioridad sobre el
//! nivel configurado con `--log-level`.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Inicializa el logging global. Llamarlo más de una vez no hace nada.
pub fn init(level: &str) -> Result<()> {
    if INITIALIZED.load(Ordering::SeqCst) {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(level)?,
    };

    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

/// Construye el filtro a partir de una directiva (ej: "info", "static_httpd=debug")
fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level))
}
