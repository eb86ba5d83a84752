//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos estáticos con soporte para
//! argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_httpd --port 8080 --workers 8 --root /srv/www
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 DOCUMENT_ROOT=/srv/www ./static_httpd
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "static_httpd")]
#[command(about = "Servidor HTTP/1.1 concurrente de archivos estáticos")]
#[command(version)]
pub struct Config {
    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Número de workers que atienden conexiones
    #[arg(short, long, default_value = "5", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Directorio desde el que se sirven los archivos
    #[arg(short = 'r', long = "root", default_value = "/www/data", env = "DOCUMENT_ROOT")]
    pub document_root: PathBuf,

    /// Conexiones aceptadas que pueden esperar un worker libre (0 = sin límite)
    #[arg(long = "queue-capacity", default_value = "0", env = "HTTP_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Nivel de logging (directiva de tracing, ej: "info" o "static_httpd=debug")
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_httpd::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        Ok(())
    }

    /// Registra la configuración efectiva
    pub fn log_summary(&self) {
        let queue = if self.queue_capacity == 0 {
            "unbounded".to_string()
        } else {
            self.queue_capacity.to_string()
        };
        info!(
            address = %self.address(),
            workers = self.workers,
            root = %self.document_root.display(),
            queue = %queue,
            log_level = %self.log_level,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 5,
            document_root: PathBuf::from("/www/data"),
            queue_capacity: 0,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 5);
        assert_eq!(config.document_root, PathBuf::from("/www/data"));
        assert_eq!(config.queue_capacity, 0);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Workers"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("Host"));
    }

    // ==================== CLI ====================

    #[test]
    fn test_parse_defaults_match_default() {
        let parsed = Config::try_parse_from(["static_httpd"]).unwrap();
        let default = Config::default();
        // Las variables de entorno pueden alterar el resultado; solo se
        // comparan si no están definidas
        if std::env::var_os("HTTP_PORT").is_none() {
            assert_eq!(parsed.port, default.port);
        }
        if std::env::var_os("HTTP_WORKERS").is_none() {
            assert_eq!(parsed.workers, default.workers);
        }
        if std::env::var_os("DOCUMENT_ROOT").is_none() {
            assert_eq!(parsed.document_root, default.document_root);
        }
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "static_httpd",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "-w",
            "3",
            "-r",
            "/srv/www",
            "--queue-capacity",
            "16",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.address(), "0.0.0.0:9000");
        assert_eq!(config.workers, 3);
        assert_eq!(config.document_root, PathBuf::from("/srv/www"));
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(Config::try_parse_from(["static_httpd", "--port", "99999"]).is_err());
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        let mut config = Config::default();
        config.queue_capacity = 8;
        config.log_summary();
        Config::default().log_summary();
    }
}
