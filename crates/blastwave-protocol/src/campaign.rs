//! Campaign (broadcast) configuration
//!
//! A campaign is created once per run and carries everything the remote service
//! needs to deliver to a recipient: the channel-specific delivery configuration and
//! an optional quiet-hours restriction.

use crate::batch::BatchRecipient;
use crate::types::{Channel, SoundId};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Local-time window outside of which dispatch to a recipient is suppressed.
///
/// Hours are hour-of-day values in `0..=23`. Ordering (`begin_hour < end_hour`) is
/// the caller's responsibility; `QuietHours::business_hours()` gives the common 8-18 window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// First hour in which dispatch is allowed
    pub begin_hour: u8,

    /// Hour at which dispatch stops
    pub end_hour: u8,
}

impl QuietHours {
    /// Create a new restriction
    pub fn new(begin_hour: u8, end_hour: u8) -> Self {
        Self {
            begin_hour,
            end_hour,
        }
    }

    /// 8 am to 6 pm in the recipient's local time zone
    pub fn business_hours() -> Self {
        Self::new(8, 18)
    }
}

/// Configuration of a text-message campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Message body; may contain `${attribute}` placeholders filled per recipient
    pub message: String,

    /// Sending number, service default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
}

impl TextConfig {
    /// Create a text configuration
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            from_number: None,
        }
    }

    /// Set the sending number
    pub fn with_from_number(mut self, from_number: impl Into<String>) -> Self {
        self.from_number = Some(from_number.into());
        self
    }
}

/// How a voice campaign treats answering machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnsweringMachineMode {
    /// Only play to a live person
    LiveOnly,
    /// Only leave machine messages
    MachineOnly,
    /// Play the live sound to people and the machine sound to machines
    #[default]
    LiveAndMachine,
    /// Start playing immediately without detection
    LiveImmediate,
}

/// Configuration of a voice-call campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Sound played when a person answers
    pub live_sound: SoundId,

    /// Sound left on an answering machine
    pub machine_sound: SoundId,

    /// Answering machine detection mode
    #[serde(default)]
    pub answering_machine: AnsweringMachineMode,

    /// Calling number, service default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_number: Option<String>,
}

impl VoiceConfig {
    /// Create a voice configuration playing `live_sound` to people and `machine_sound` to machines
    pub fn new(live_sound: SoundId, machine_sound: SoundId) -> Self {
        Self {
            live_sound,
            machine_sound,
            answering_machine: AnsweringMachineMode::default(),
            from_number: None,
        }
    }

    /// Set the answering machine mode
    pub fn with_answering_machine(mut self, mode: AnsweringMachineMode) -> Self {
        self.answering_machine = mode;
        self
    }

    /// Set the calling number
    pub fn with_from_number(mut self, from_number: impl Into<String>) -> Self {
        self.from_number = Some(from_number.into());
        self
    }
}

/// Channel-specific delivery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum DeliveryConfig {
    /// Text message delivery
    Text(TextConfig),
    /// Voice call delivery
    Voice(VoiceConfig),
}

impl DeliveryConfig {
    /// The channel this configuration delivers on
    pub fn channel(&self) -> Channel {
        match self {
            Self::Text(_) => Channel::Text,
            Self::Voice(_) => Channel::Voice,
        }
    }
}

impl From<TextConfig> for DeliveryConfig {
    fn from(config: TextConfig) -> Self {
        Self::Text(config)
    }
}

impl From<VoiceConfig> for DeliveryConfig {
    fn from(config: VoiceConfig) -> Self {
        Self::Voice(config)
    }
}

/// Request to create a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct CampaignSpec {
    /// Human-readable campaign name
    pub name: String,

    /// Delivery configuration
    pub delivery: DeliveryConfig,

    /// Optional quiet-hours restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub quiet_hours: Option<QuietHours>,
}

impl CampaignSpec {
    /// Create a builder for a campaign spec
    pub fn builder() -> CampaignSpecBuilder {
        CampaignSpecBuilder::default()
    }

    /// The channel of this campaign
    pub fn channel(&self) -> Channel {
        self.delivery.channel()
    }
}

/// Create-and-start request: a campaign and its recipients in one call.
///
/// The service assigns the batch internally and never reports its id back, so
/// status for a direct send is tracked across the whole campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectSend {
    /// Campaign configuration
    #[serde(flatten)]
    pub campaign: CampaignSpec,

    /// Recipients to deliver to
    pub recipients: Vec<BatchRecipient>,
}

/// Audio payload uploaded for use in voice campaigns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundUpload {
    /// Display name of the sound
    pub name: String,

    /// Raw audio bytes (mp3 or wav)
    pub data: Vec<u8>,
}

impl SoundUpload {
    /// Create a new upload
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_spec_builder() {
        let spec = CampaignSpec::builder()
            .name("student registration notification broadcast")
            .delivery(TextConfig::new("Welcome to the school year!"))
            .quiet_hours(QuietHours::business_hours())
            .build()
            .unwrap();

        assert_eq!(spec.channel(), Channel::Text);
        assert_eq!(spec.quiet_hours, Some(QuietHours::new(8, 18)));
    }

    #[test]
    fn test_campaign_spec_builder_requires_delivery() {
        let result = CampaignSpec::builder().name("no delivery").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_delivery_config_serialization_is_tagged() {
        let config: DeliveryConfig = VoiceConfig::new(SoundId(1), SoundId(2))
            .with_from_number("12132212289")
            .into();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["channel"], "voice");
        assert_eq!(json["live_sound"], 1);
        assert_eq!(json["answering_machine"], "LIVE_AND_MACHINE");

        let back: DeliveryConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.channel(), Channel::Voice);
    }
}
