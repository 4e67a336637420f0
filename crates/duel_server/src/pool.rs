//! Bounded pool of concurrently running sessions.
//!
//! Submitted sessions go into an unbounded FIFO queue. A pump task takes
//! them one at a time, waits for a free slot, and spawns each with the slot's
//! permit; the permit is released when the session future completes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs at most `capacity` sessions at once; the rest wait in order.
#[derive(Debug, Clone)]
pub struct SessionPool {
    queue: mpsc::UnboundedSender<Job>,
    permits: Arc<Semaphore>,
    queued: Arc<AtomicUsize>,
    capacity: usize,
}

impl SessionPool {
    /// Creates the pool and its pump task. Must be called inside a runtime.
    pub fn new(capacity: usize) -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<Job>();
        let permits = Arc::new(Semaphore::new(capacity));
        let queued = Arc::new(AtomicUsize::new(0));

        let pump_permits = Arc::clone(&permits);
        let pump_queued = Arc::clone(&queued);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let Ok(permit) = Arc::clone(&pump_permits).acquire_owned().await else {
                    warn!("Session pool closed, dropping queued sessions");
                    break;
                };
                pump_queued.fetch_sub(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    job.await;
                    drop(permit);
                });
            }
            debug!("Session pool pump stopped");
        });

        Self {
            queue,
            permits,
            queued,
            capacity,
        }
    }

    /// Queues a session; it starts as soon as a slot is free.
    pub fn submit<F>(&self, session: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(Box::pin(session)).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            warn!("Session pool is not running; session dropped");
        }
    }

    /// Maximum number of concurrent sessions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Sessions currently running.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Sessions submitted but not yet started.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }
}
