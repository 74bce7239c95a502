//! Channel-specific terminal predicates
//!
//! Channels disagree on which results end tracking for a recipient: a text is only
//! done once it is delivered, while a call is done once it has been attempted at
//! all. The poller takes the rule as a [`TerminalPredicate`] so one engine serves both.

use blastwave_protocol::{Channel, TerminalResult};
use std::sync::Arc;

/// Decides whether a reported result stops tracking a recipient.
pub trait TerminalPredicate: Send + Sync {
    /// Whether `result` is terminal for polling purposes.
    fn is_terminal(&self, result: TerminalResult) -> bool;
}

impl<F> TerminalPredicate for F
where
    F: Fn(TerminalResult) -> bool + Send + Sync,
{
    fn is_terminal(&self, result: TerminalResult) -> bool {
        self(result)
    }
}

/// Only an affirmative delivery is terminal. Used for text campaigns.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveredOnly;

impl TerminalPredicate for DeliveredOnly {
    fn is_terminal(&self, result: TerminalResult) -> bool {
        result == TerminalResult::Delivered
    }
}

/// Any result other than "not yet attempted" is terminal. Used for voice campaigns.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyButUndialed;

impl TerminalPredicate for AnyButUndialed {
    fn is_terminal(&self, result: TerminalResult) -> bool {
        result != TerminalResult::Undialed
    }
}

/// The default predicate for a channel.
pub fn for_channel(channel: Channel) -> Arc<dyn TerminalPredicate> {
    match channel {
        Channel::Text => Arc::new(DeliveredOnly),
        Channel::Voice => Arc::new(AnyButUndialed),
    }
}
