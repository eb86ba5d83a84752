//! # Señales de Interrupción
//! src/server/signals.rs
//!
//! Un thread dedicado escucha SIGINT y SIGTERM. La primera señal pide un
//! apagado ordenado; las siguientes fuerzan el apagado descartando las
//! conexiones que todavía esperan un worker.

use super::tcp::ShutdownHandle;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Thread que traduce señales en pedidos de apagado
pub struct SignalListener {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalListener {
    /// Registra los handlers y lanza el thread
    pub fn install(shutdown: ShutdownHandle) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    if shutdown.is_requested() {
                        warn!(signal, "second interrupt, abandoning queued connections");
                        shutdown.force();
                    } else {
                        info!(signal, "interrupt received, shutting down");
                        shutdown.shutdown();
                    }
                }
            })?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Deja de escuchar señales y espera al thread
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SignalListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{Server, ServerState};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_sigterm_triggers_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            port: 0,
            workers: 1,
            document_root: dir.path().to_path_buf(),
            ..Config::default()
        };

        let mut server = Server::new(config);
        let handle = server.start().unwrap();
        let listener = SignalListener::install(handle.clone()).unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let t = std::thread::spawn(move || {
            server.run().unwrap();
            done_tx.send(server.state()).unwrap();
        });

        signal_hook::low_level::raise(SIGTERM).unwrap();

        let state = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(state, ServerState::Stopped);
        assert!(handle.is_requested());

        t.join().unwrap();
        listener.close();
    }
}
