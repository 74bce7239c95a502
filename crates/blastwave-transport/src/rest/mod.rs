//! JSON REST transport
//!
//! Provides a reqwest-backed client implementing both collaborator traits.

pub mod client;

pub use client::{RestClient, RestClientBuilder};
