//! # Static HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente de archivos estáticos implementado desde
//! cero: un thread acepta conexiones y un pool fijo de workers atiende un
//! request por conexión.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y serialización del protocolo HTTP/1.1
//! - `handler`: Trait de handlers por método y el handler de archivos estáticos
//! - `server`: Loop de accept, pool de workers, manejo de conexiones y señales
//! - `config`: Configuración por CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_httpd::config::Config;
//! use static_httpd::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! let _shutdown = server.start().expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop del servidor");
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod logging;
pub mod server;
