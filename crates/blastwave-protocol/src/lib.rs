//! Shared data model for the blastwave dispatch engine
//!
//! This crate holds the plain data exchanged between the engine and the remote
//! dispatch service: campaign and delivery configuration, schedules, batches,
//! per-recipient status records and the fault type every remote call can fail with.
//!
//! # Type Organization
//!
//! - **Identifiers**: [`types`] - campaign, batch, schedule, sound and recipient ids
//! - **Campaigns**: [`campaign`] - delivery configuration, quiet hours, direct sends
//! - **Schedules**: [`schedule`] - recurring run windows and the lookup result
//! - **Batches**: [`batch`] - recipient groups submitted against a campaign
//! - **Status**: [`status`] - terminal results reported per recipient
//! - **Faults**: [`error`] - remote fault codes
//!
//! # Design Principles
//!
//! - **Zero I/O**: All types are pure data structures
//! - **Serialization**: serde-based, JSON on the wire
//! - **No circular dependencies**: blastwave-protocol depends only on serde, chrono, derive_builder and thiserror

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod campaign;
pub mod error;
pub mod schedule;
pub mod status;
pub mod types;

// Re-export commonly used types at crate level
pub use batch::{BatchRecipient, NewBatch};
pub use campaign::{
    AnsweringMachineMode, CampaignSpec, CampaignSpecBuilder, CampaignSpecBuilderError,
    DeliveryConfig, DirectSend, QuietHours, SoundUpload, TextConfig, VoiceConfig,
};
pub use error::{DispatchFault, FaultCode};
pub use schedule::{Schedule, ScheduleLookup, ScheduleRequest};
pub use status::{StatusRecord, TerminalResult};
pub use types::{BatchId, CampaignId, Channel, RecipientId, ScheduleId, SoundId};
