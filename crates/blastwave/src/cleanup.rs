//! Verified schedule teardown
//!
//! Deleting a schedule is a two-phase protocol: issue the delete, then look the
//! schedule up again and require a "not found" answer. Any other answer means
//! the delete cannot be trusted and is reported as
//! [`Error::CleanupInconsistency`].

use crate::error::{CleanupFailure, Error, Result};
use blastwave_protocol::ScheduleId;
use blastwave_transport::ResourceStore;
use std::sync::Arc;
use tracing::{error, info};

/// Deletes schedules and confirms they are gone.
#[derive(Debug, Clone)]
pub struct ScheduleCleanup {
    store: Arc<dyn ResourceStore>,
}

impl ScheduleCleanup {
    /// Create a cleanup helper over `store`.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Delete `schedule_id` and verify the store no longer has it.
    ///
    /// # Errors
    ///
    /// - `Error::Remote` if the delete itself fails
    /// - `Error::CleanupInconsistency` with [`CleanupFailure::StillPresent`] if the
    ///   schedule is still returned afterwards
    /// - `Error::CleanupInconsistency` with [`CleanupFailure::UnexpectedFault`] if the
    ///   lookup fails for any reason other than "not found"
    #[tracing::instrument(skip(self, schedule_id), fields(schedule_id = %schedule_id))]
    pub async fn delete_and_verify(&self, schedule_id: ScheduleId) -> Result<()> {
        self.store.delete_schedule(schedule_id).await?;

        let kind = match self.store.get_schedule(schedule_id).await {
            Ok(lookup) if !lookup.is_found() => {
                info!(schedule_id = %schedule_id, "Schedule deleted");
                return Ok(());
            }
            Ok(_) => CleanupFailure::StillPresent,
            Err(fault) => CleanupFailure::UnexpectedFault(fault),
        };

        error!(schedule_id = %schedule_id, failure = %kind, "Schedule deletion not confirmed");
        Err(Error::CleanupInconsistency { schedule_id, kind })
    }

    /// Delete and verify `schedule_id` if there is one.
    pub async fn cleanup(&self, schedule_id: Option<ScheduleId>) -> Result<()> {
        match schedule_id {
            Some(schedule_id) => self.delete_and_verify(schedule_id).await,
            None => Ok(()),
        }
    }
}

