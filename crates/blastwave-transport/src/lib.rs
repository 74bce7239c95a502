//! Collaborator interfaces and REST transport for blastwave
//!
//! The dispatch engine talks to the outside world through two traits:
//!
//! - **[`DispatchService`]**: create and start campaigns, submit batches, query status
//! - **[`ResourceStore`]**: create, fetch and delete schedules; upload sounds
//!
//! [`RestClient`] implements both over a JSON REST API with HTTP basic
//! authentication. Tests and alternative backends implement the traits directly.
//!
//! # Usage
//!
//! ```ignore
//! use blastwave_transport::{DispatchService, RestClient};
//! use blastwave_protocol::CampaignId;
//!
//! let client = RestClient::builder()
//!     .base_url("https://dev.api.blastwave.io/v1")
//!     .credentials("user", "password")
//!     .build()?;
//! let records = client.query_status(CampaignId(42)).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod observability;
pub mod rest;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use rest::{RestClient, RestClientBuilder};
pub use traits::{DispatchService, ResourceStore};
