//! Structured logging for campaign runs
//!
//! Poll progress and outcomes are logged through this module so every driver
//! reports them with the same fields.

use crate::poller::{PollOutcome, PollReport};
use crate::recipients::BatchScope;
use blastwave_protocol::{CampaignId, RecipientId};
use tracing::{debug, info, warn};

/// Log the start of a completion poll
pub fn log_poll_started(campaign_id: CampaignId, scope: BatchScope, outstanding: usize) {
    info!(
        campaign_id = %campaign_id,
        scope = ?scope,
        outstanding,
        "Polling for recipient status"
    );
}

/// Log one status query
pub fn log_poll_tick(campaign_id: CampaignId, poll: u32, records: usize, outstanding: usize) {
    debug!(
        campaign_id = %campaign_id,
        poll,
        records,
        outstanding,
        "Status snapshot received"
    );
}

/// Log a recipient reaching a terminal result
pub fn log_recipient_resolved(campaign_id: CampaignId, recipient: &RecipientId) {
    info!(campaign_id = %campaign_id, recipient = %recipient, "Recipient finished");
}

/// Log the end of a completion poll.
///
/// A timeout is a normal outcome and is logged as a warning, not an error.
pub fn log_poll_finished(campaign_id: CampaignId, report: &PollReport) {
    let elapsed_ms = report.elapsed.as_millis();
    match report.outcome {
        PollOutcome::Complete => info!(
            campaign_id = %campaign_id,
            polls = report.polls,
            elapsed_ms,
            "Received positive response for every recipient"
        ),
        PollOutcome::TimedOut => warn!(
            campaign_id = %campaign_id,
            polls = report.polls,
            elapsed_ms,
            remaining = report.remaining.len(),
            "Did not receive positive response before the deadline"
        ),
        PollOutcome::Cancelled => warn!(
            campaign_id = %campaign_id,
            polls = report.polls,
            elapsed_ms,
            remaining = report.remaining.len(),
            "Poll cancelled"
        ),
    }
}

/// Install a `tracing-subscriber` formatter driven by `RUST_LOG`.
///
/// Intended for drivers; libraries should leave subscriber setup to the binary.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
