//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool de tamaño fijo: N threads que sacan trabajos de una cola MPMC.
//! Cada conexión ocupa un worker durante todo su ciclo request/response.
//!
//! ## Apagado
//!
//! - `shutdown()`: cierra la cola y espera a que los workers vacíen lo
//!   pendiente y terminen.
//! - `AbandonHandle::abandon()`: a partir de ese momento los workers
//!   descartan los trabajos que todavía no empezaron. Los que están en
//!   ejecución terminan normalmente.

use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, warn};

/// Trabajo que ejecuta un worker
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errores al encolar trabajo
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// El pool ya fue apagado
    #[error("worker pool is shut down")]
    ShutDown,
}

/// Permite abandonar los trabajos encolados desde otro thread
#[derive(Debug, Clone)]
pub struct AbandonHandle {
    flag: Arc<AtomicBool>,
}

impl AbandonHandle {
    pub fn abandon(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_abandoned(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Un thread del pool
struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, receiver: Receiver<Job>, abandon: AbandonHandle) -> io::Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || {
                let mut abandoned = 0usize;
                // `iter()` termina cuando se cierra la cola y está vacía
                for job in receiver.iter() {
                    if abandon.is_abandoned() {
                        abandoned += 1;
                        drop(job);
                        continue;
                    }
                    job();
                }
                if abandoned > 0 {
                    warn!(worker = id, abandoned, "dropped queued jobs on forced shutdown");
                }
                debug!(worker = id, "worker stopped");
            })?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }
}

/// Pool de threads de tamaño fijo
pub struct WorkerPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
    abandon: AbandonHandle,
}

impl WorkerPool {
    /// Crea un pool con `size` workers.
    ///
    /// `queue_capacity` limita cuántos trabajos pueden esperar un worker libre
    /// (0 = sin límite). Con límite, `execute` bloquea cuando la cola está llena.
    pub fn new(size: usize, queue_capacity: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool size must be >= 1",
            ));
        }

        let (sender, receiver) = if queue_capacity == 0 {
            crossbeam_channel::unbounded()
        } else {
            crossbeam_channel::bounded(queue_capacity)
        };
        let abandon = AbandonHandle {
            flag: Arc::new(AtomicBool::new(false)),
        };

        let workers = (0..size)
            .map(|id| Worker::spawn(id, receiver.clone(), abandon.clone()))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            workers,
            sender: Some(sender),
            abandon,
        })
    }

    /// Encola un trabajo para el próximo worker libre
    pub fn execute<F>(&self, f: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::ShutDown)?;
        sender.send(Box::new(f)).map_err(|_| PoolError::ShutDown)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Trabajos encolados que todavía no toma ningún worker
    pub fn pending(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    pub fn abandon_handle(&self) -> AbandonHandle {
        self.abandon.clone()
    }

    /// Cierra la cola y espera a que terminen todos los workers
    pub fn shutdown(&mut self) {
        // Sin sender, los workers salen del loop al vaciar la cola
        self.sender.take();

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!(worker = worker.id, "worker thread panicked");
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{mpsc, Barrier};
    use std::time::Duration;

    #[test]
    fn test_zero_workers_rejected() {
        assert!(WorkerPool::new(0, 0).is_err());
    }

    #[test]
    fn test_runs_all_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool = WorkerPool::new(3, 0).unwrap();
        assert_eq!(pool.size(), 3);

        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_jobs_run_concurrently() {
        // Con 4 workers, 4 trabajos que esperan en la misma barrera terminan
        let pool = WorkerPool::new(4, 0).unwrap();
        let barrier = Arc::new(Barrier::new(4));
        let (tx, rx) = mpsc::channel();

        for _ in 0..4 {
            let barrier = Arc::clone(&barrier);
            let tx = tx.clone();
            pool.execute(move || {
                barrier.wait();
                tx.send(()).unwrap();
            })
            .unwrap();
        }

        for _ in 0..4 {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
    }

    #[test]
    fn test_execute_after_shutdown_fails() {
        let mut pool = WorkerPool::new(1, 0).unwrap();
        pool.shutdown();
        assert_eq!(pool.execute(|| {}), Err(PoolError::ShutDown));
    }

    #[test]
    fn test_abandon_drops_queued_jobs() {
        let mut pool = WorkerPool::new(1, 0).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        // Ocupar el único worker
        {
            let ran = Arc::clone(&ran);
            pool.execute(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // Estos quedan en la cola
        for _ in 0..5 {
            let ran = Arc::clone(&ran);
            pool.execute(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        assert_eq!(pool.pending(), 5);

        pool.abandon_handle().abandon();
        release_tx.send(()).unwrap();
        pool.shutdown();

        // Solo terminó el que ya estaba en ejecución
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bounded_queue_applies_backpressure() {
        let pool = WorkerPool::new(1, 1).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel();

        pool.execute(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        })
        .unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // Llena la cola (capacidad 1)
        pool.execute(|| {}).unwrap();
        assert_eq!(pool.pending(), 1);

        release_tx.send(()).unwrap();
    }
}
