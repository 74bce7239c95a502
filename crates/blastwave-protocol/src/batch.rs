//! Batches of recipients submitted against an existing campaign

use crate::types::{CampaignId, RecipientId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single recipient with optional template attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecipient {
    /// Recipient endpoint
    pub id: RecipientId,

    /// Key/value attributes substituted into `${key}` placeholders of the message
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl BatchRecipient {
    /// Create a recipient without attributes
    pub fn new(id: impl Into<RecipientId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a template attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Request to create a batch on a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBatch {
    /// Batch name
    pub name: String,

    /// Campaign the batch is attached to
    pub campaign_id: CampaignId,

    /// Recipients in submission order
    pub recipients: Vec<BatchRecipient>,

    /// Whether the service should drop recipients already dialed by earlier batches
    #[serde(default)]
    pub scrub_duplicates: bool,
}

impl NewBatch {
    /// Identifiers of every recipient in the batch
    pub fn recipient_ids(&self) -> impl Iterator<Item = &RecipientId> {
        self.recipients.iter().map(|r| &r.id)
    }
}
