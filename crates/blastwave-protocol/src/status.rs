//! Per-recipient status reported by the dispatch service

use crate::types::{BatchId, RecipientId};
use serde::{Deserialize, Serialize};

/// Final result of a dispatch attempt to one recipient.
///
/// Which of these values stop polling depends on the channel: text campaigns only
/// accept [`TerminalResult::Delivered`], voice campaigns accept anything except
/// [`TerminalResult::Undialed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalResult {
    /// Message sent / delivered
    #[serde(alias = "SENT")]
    Delivered,
    /// The recipient has not been attempted yet
    Undialed,
    /// A person answered
    LiveAnswer,
    /// An answering machine picked up
    AnsweringMachine,
    /// Line busy
    Busy,
    /// Nobody answered
    NoAnswer,
    /// Recipient is on a do-not-contact list
    DoNotContact,
    /// Delivery failed
    Failed,
    /// A result this version does not know about
    #[serde(other)]
    Unknown,
}

/// Status of one recipient within one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Recipient endpoint
    pub recipient_id: RecipientId,

    /// Batch the attempt belongs to
    pub batch_id: BatchId,

    /// Final result, absent while the attempt is still pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TerminalResult>,
}

impl StatusRecord {
    /// A record still awaiting a result
    pub fn pending(recipient_id: impl Into<RecipientId>, batch_id: BatchId) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            batch_id,
            result: None,
        }
    }

    /// A record with a final result
    pub fn finished(
        recipient_id: impl Into<RecipientId>,
        batch_id: BatchId,
        result: TerminalResult,
    ) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            batch_id,
            result: Some(result),
        }
    }

    /// Whether the service has not reported a result yet
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }
}
