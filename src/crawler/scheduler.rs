//! Bounded worker pool for concurrent page fetches
//!
//! This module handles:
//! - Sizing the pool from available parallelism within configured bounds
//! - Global concurrency limiting via a semaphore

use crate::config::WorkerConfig;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity pool limiting how many pages are fetched at once
///
/// Clones share the same permits, so several runs can draw from one limit.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool with exactly `size` workers (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Creates a pool sized from the machine's parallelism and the configured bounds
    pub fn from_config(config: &WorkerConfig) -> Self {
        let size = pool_size(
            available_parallelism(),
            config.min_workers,
            config.max_workers,
        );
        tracing::debug!("Worker pool size: {}", size);
        Self::new(size)
    }

    /// Number of pages that may be in flight at once
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of workers currently idle
    pub fn idle_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for an idle worker
    ///
    /// The worker is returned to the pool when the permit is dropped.
    /// Returns `None` only if the pool has been closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.semaphore.clone().acquire_owned().await.ok()
    }
}

/// Clamps the available parallelism into `[min_workers, max_workers]`
///
/// A `max_workers` below `min_workers` is treated as equal to it.
pub fn pool_size(available: usize, min_workers: usize, max_workers: usize) -> usize {
    available.clamp(min_workers, max_workers.max(min_workers))
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
