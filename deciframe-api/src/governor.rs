//! Concurrency governor for similarity searches
//!
//! A counting admission gate: at most `capacity` searches run their
//! storage and ranking phase at once. Excess requests wait in line for a
//! slot; nothing is rejected and there is no acquisition deadline.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::error::{Result, SearchError};

/// Fixed-capacity admission gate
#[derive(Debug, Clone)]
pub struct Governor {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held slot; dropping it frees the slot
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Governor {
    /// Create a gate with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot
    ///
    /// The slot is released when the returned [`Slot`] is dropped, so every
    /// exit path of the caller (including `?` returns) gives it back.
    pub async fn acquire(&self) -> Result<Slot> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SearchError::Internal("admission gate closed".to_string()))?;

        debug!(
            "Search slot acquired ({} of {} free)",
            self.semaphore.available_permits(),
            self.capacity
        );

        Ok(Slot { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
