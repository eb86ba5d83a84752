//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread hace `accept` bloqueante y entrega cada conexión al pool de
//! workers. El `accept` nunca pasa por el pool; solo el manejo de la conexión.
//!
//! ## Ciclo de vida
//!
//! ```text
//! Idle ──start()──→ Listening ──run() termina──→ ShuttingDown ──→ Stopped
//! ```
//!
//! `start()` valida el document root, hace bind y crea el pool. `run()`
//! acepta conexiones hasta que alguien llama `ShutdownHandle::shutdown()`;
//! después cierra el socket de escucha y espera a los workers.

use super::connection::handle_connection;
use super::pool::{AbandonHandle, WorkerPool};
use crate::config::Config;
use crate::handler::{Handler, StaticHandler};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Cuánto esperar la conexión que despierta al `accept` durante el apagado
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Pausa del loop de `accept` ante errores persistentes (ej: EMFILE)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Errores fatales del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Document root {} is not an existing dir. Cannot start server", .0.display())]
    InvalidDocumentRoot(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server is already running")]
    AlreadyRunning,

    #[error("Server has already been stopped")]
    AlreadyStopped,

    #[error("Server is not running")]
    NotRunning,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Estado del ciclo de vida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Listening,
    ShuttingDown,
    Stopped,
}

/// Permite pedir el apagado desde otro thread (ej: el de señales)
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    wake_addr: SocketAddr,
    abandon: AbandonHandle,
}

impl ShutdownHandle {
    /// Apagado ordenado: deja de aceptar conexiones y espera las que ya entraron
    pub fn shutdown(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        // Despertar al accept bloqueante con una conexión propia
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, WAKE_TIMEOUT) {
            debug!(error = %e, "wake-up connection failed");
        }
    }

    /// Apagado inmediato: además descarta las conexiones encoladas que
    /// ningún worker tomó todavía. Las que están en curso terminan.
    pub fn force(&self) {
        self.abandon.abandon();
        self.shutdown();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Recursos que existen solo mientras el servidor escucha
struct Running {
    listener: TcpListener,
    pool: WorkerPool,
    handler: Arc<dyn Handler>,
    shutdown: ShutdownHandle,
}

/// Servidor HTTP/1.1 de archivos estáticos
pub struct Server {
    config: Config,
    state: ServerState,
    running: Option<Running>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: ServerState::Idle,
            running: None,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Dirección real de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .as_ref()
            .and_then(|running| running.listener.local_addr().ok())
    }

    /// Valida la configuración, hace bind y crea el pool de workers.
    ///
    /// Retorna el handle para pedir el apagado. Llamarlo dos veces es un error.
    pub fn start(&mut self) -> Result<ShutdownHandle, ServerError> {
        match self.state {
            ServerState::Idle => {}
            ServerState::Listening | ServerState::ShuttingDown => {
                return Err(ServerError::AlreadyRunning)
            }
            ServerState::Stopped => return Err(ServerError::AlreadyStopped),
        }
        self.config.validate().map_err(ServerError::InvalidConfig)?;

        let root = &self.config.document_root;
        if !root.is_dir() {
            return Err(ServerError::InvalidDocumentRoot(root.clone()));
        }
        let handler = StaticHandler::new(root)?;

        // En unix std ya activa SO_REUSEADDR en el bind
        let listener = TcpListener::bind(self.config.address())?;
        let local_addr = listener.local_addr()?;
        let pool = WorkerPool::new(self.config.workers, self.config.queue_capacity)?;

        let shutdown = ShutdownHandle {
            requested: Arc::new(AtomicBool::new(false)),
            wake_addr: wake_address(local_addr),
            abandon: pool.abandon_handle(),
        };

        info!(
            address = %local_addr,
            workers = pool.size(),
            root = %handler.root().display(),
            "Server is ready to accept client connections"
        );

        self.running = Some(Running {
            listener,
            pool,
            handler: Arc::new(handler),
            shutdown: shutdown.clone(),
        });
        self.state = ServerState::Listening;

        Ok(shutdown)
    }

    /// Loop de `accept`. Bloquea hasta que se pide el apagado y luego
    /// cierra el socket y espera a los workers.
    pub fn run(&mut self) -> Result<(), ServerError> {
        if self.state != ServerState::Listening {
            return Err(ServerError::NotRunning);
        }
        let running = self.running.as_ref().ok_or(ServerError::NotRunning)?;

        for stream in running.listener.incoming() {
            if running.shutdown.is_requested() {
                // Puede ser la conexión que despierta al accept o un cliente tardío
                debug!("dropping connection accepted during shutdown");
                break;
            }

            match stream {
                Ok(stream) => {
                    let handler = Arc::clone(&running.handler);
                    let submitted = running.pool.execute(move || {
                        // Los errores de escritura ya se registraron; la conexión se descarta
                        let _ = handle_connection(stream, handler.as_ref());
                    });
                    if let Err(e) = submitted {
                        warn!(error = %e, "could not dispatch connection");
                    }
                }
                Err(e) => match accept_backoff(&e) {
                    None => debug!(error = %e, "transient accept error"),
                    Some(delay) => {
                        warn!(
                            error = %e,
                            backoff_ms = delay.as_millis() as u64,
                            "failed to accept connection"
                        );
                        thread::sleep(delay);
                    }
                },
            }
        }

        self.stop();
        Ok(())
    }

    /// Cierra el socket de escucha y espera a que terminen los workers
    fn stop(&mut self) {
        self.state = ServerState::ShuttingDown;
        if let Some(running) = self.running.take() {
            let Running {
                listener, mut pool, ..
            } = running;

            drop(listener);
            info!(pending = pool.pending(), "listener closed, waiting for in-flight requests");

            pool.shutdown();
        }
        self.state = ServerState::Stopped;
        info!("server stopped");
    }
}

/// Cuánto esperar antes de reintentar el `accept` después de un error.
///
/// `None` para errores de una sola conexión, que se reintentan enseguida.
/// El resto (falta de descriptores, memoria) no se resuelve solo, así que
/// se espera para no girar en vacío.
fn accept_backoff(err: &io::Error) -> Option<Duration> {
    match err.kind() {
        io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset => None,
        _ => Some(ACCEPT_BACKOFF),
    }
}

/// Dirección a la que conectarse para despertar al listener.
/// Si escucha en 0.0.0.0 / ::, se usa loopback.
fn wake_address(local: SocketAddr) -> SocketAddr {
    let ip = match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local.port())
}
