//! # Blastwave
//!
//! Campaign dispatch and completion polling for text and voice broadcasts:
//! - Campaign creation with quiet hours and recurring schedules
//! - Batch submission and campaign start
//! - Bounded polling until every recipient reaches a terminal result
//! - Verified schedule teardown
//!
//! The remote side is reached through the [`DispatchService`] and
//! [`ResourceStore`] traits; [`RestClient`] implements both.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blastwave::{Broadcaster, RunConfig};
//! use blastwave_protocol::{BatchRecipient, CampaignSpec, Channel, QuietHours, TextConfig};
//!
//! #[tokio::main]
//! async fn main() -> blastwave::Result<()> {
//!     let broadcaster = Broadcaster::from_config(&RunConfig::from_env()?)?;
//!
//!     let spec = CampaignSpec::builder()
//!         .name("Registration")
//!         .delivery(TextConfig::new("Thanks for registering"))
//!         .quiet_hours(QuietHours::business_hours())
//!         .build()?;
//!     let campaign_id = broadcaster.campaigns().create_campaign(&spec).await?;
//!
//!     let run = broadcaster
//!         .dispatch_and_await(
//!             campaign_id,
//!             Channel::Text,
//!             "first batch",
//!             &[BatchRecipient::new("15550001"), BatchRecipient::new("15550002")],
//!         )
//!         .await?;
//!
//!     println!("finished: {}", run.report.is_complete());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use broadcaster::{Broadcaster, DispatchRun};
pub use campaign::{CampaignBuilder, ScheduledCampaign};
pub use cleanup::ScheduleCleanup;
pub use config::{Environment, RunConfig, RunConfigBuilder};
pub use dispatch::BatchDispatcher;
pub use error::{CleanupFailure, Error, Result};
pub use poller::{CompletionPoller, PollConfig, PollOutcome, PollReport};
pub use predicate::{AnyButUndialed, DeliveredOnly, TerminalPredicate};
pub use recipients::{BatchScope, RecipientSet};

pub use blastwave_transport::{DispatchService, ResourceStore, RestClient};

pub mod broadcaster;
pub mod campaign;
pub mod cleanup;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod poller;
pub mod predicate;
pub mod recipients;
pub mod validation;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use blastwave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BatchScope, Broadcaster, CompletionPoller, Error, PollConfig, PollOutcome, PollReport,
        Result, RunConfig,
    };
    pub use blastwave_protocol::{
        BatchId, BatchRecipient, CampaignId, CampaignSpec, Channel, QuietHours, RecipientId,
        ScheduleRequest, TextConfig, VoiceConfig,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
