//! Error types for the dispatch engine
//!
//! Every fatal condition surfaces to the immediate caller. A poll that reaches its
//! deadline is not an error; see [`PollOutcome`](crate::poller::PollOutcome).

use blastwave_protocol::{
    BatchId, CampaignId, CampaignSpecBuilderError, DispatchFault, FaultCode, ScheduleId,
};
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the dispatch engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The dispatch service or resource store reported a fault.
    #[error("Remote fault: {0}")]
    Remote(#[from] DispatchFault),

    /// A batch was created but the campaign could not be started.
    ///
    /// The batch is left in place; nothing is rolled back.
    #[error("Batch {batch_id} created but campaign {campaign_id} failed to start: {fault}")]
    StartFailed {
        /// Campaign that failed to start
        campaign_id: CampaignId,
        /// Batch that was already created
        batch_id: BatchId,
        /// Fault returned by the start command
        #[source]
        fault: DispatchFault,
    },

    /// A status query on an active campaign returned no records at all.
    #[error("Status query for campaign {campaign_id} returned no records")]
    ProtocolViolation {
        /// Campaign that was queried
        campaign_id: CampaignId,
    },

    /// Deleting a schedule could not be verified.
    #[error("Cleanup of schedule {schedule_id} could not be verified: {kind}")]
    CleanupInconsistency {
        /// Schedule being removed
        schedule_id: ScheduleId,
        /// What the verification lookup saw
        kind: CleanupFailure,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid campaign spec.
    #[error("Invalid campaign spec: {0}")]
    Spec(#[from] CampaignSpecBuilderError),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport could not be constructed.
    #[error("Transport error: {0}")]
    Transport(#[from] blastwave_transport::TransportError),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// What the post-delete lookup of a schedule returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanupFailure {
    /// The schedule is still visible after the delete succeeded
    #[error("schedule still present after delete")]
    StillPresent,

    /// The lookup failed with something other than "not found"
    #[error("unexpected fault {0}")]
    UnexpectedFault(DispatchFault),
}

impl Error {
    /// Fault code carried by this error, if it came from the remote side.
    pub fn fault_code(&self) -> Option<&FaultCode> {
        match self {
            Error::Remote(fault) | Error::StartFailed { fault, .. } => Some(&fault.code),
            Error::CleanupInconsistency {
                kind: CleanupFailure::UnexpectedFault(fault),
                ..
            } => Some(&fault.code),
            _ => None,
        }
    }

    /// Whether this error was raised by a remote fault rather than locally.
    pub fn is_remote(&self) -> bool {
        self.fault_code().is_some()
    }
}
