//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto (`tcp`)
//! 2. Acepta conexiones y las entrega al pool de workers (`pool`)
//! 3. Lee el request, lo despacha y escribe la respuesta (`connection`)
//! 4. Se apaga ordenadamente ante SIGINT / SIGTERM (`signals`)

pub mod connection;
pub mod pool;
#[cfg(unix)]
pub mod signals;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::handle_connection;
pub use pool::{AbandonHandle, PoolError, WorkerPool};
#[cfg(unix)]
pub use signals::SignalListener;
pub use tcp::{Server, ServerError, ServerState, ShutdownHandle};
