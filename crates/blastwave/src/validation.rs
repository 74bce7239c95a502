//! Request validation
//!
//! Requests are checked locally before any remote call so a malformed campaign
//! never leaves a half-created resource behind. Only structural rules are
//! enforced here: hour ordering (for example a quiet-hours window that wraps
//! midnight) is left to the caller.

use crate::error::{Error, Result};
use blastwave_protocol::{
    BatchRecipient, CampaignSpec, DeliveryConfig, DirectSend, QuietHours, ScheduleRequest,
    SoundUpload,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Highest valid hour of day
pub const MAX_HOUR: u8 = 23;

/// Validate a campaign before creation.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the name or text message is blank, or if a
/// quiet-hours bound is outside 0..=23.
pub fn validate_campaign_spec(spec: &CampaignSpec) -> Result<()> {
    debug!(
        name = %spec.name,
        channel = ?spec.channel(),
        has_quiet_hours = spec.quiet_hours.is_some(),
        "Validating campaign spec"
    );

    validate_name("campaign name", &spec.name)?;

    if let DeliveryConfig::Text(text) = &spec.delivery
        && text.message.trim().is_empty()
    {
        return Err(Error::InvalidRequest(
            "text message cannot be empty".to_string(),
        ));
    }

    if let Some(quiet_hours) = &spec.quiet_hours {
        validate_quiet_hours(quiet_hours)?;
    }

    Ok(())
}

/// Validate quiet-hours bounds.
pub fn validate_quiet_hours(quiet_hours: &QuietHours) -> Result<()> {
    validate_hour("quiet hours begin", quiet_hours.begin_hour)?;
    validate_hour("quiet hours end", quiet_hours.end_hour)
}

/// Validate a schedule request.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if no weekday is given, an hour is outside
/// 0..=23, or the time zone is blank.
pub fn validate_schedule_request(request: &ScheduleRequest) -> Result<()> {
    if request.days.is_empty() {
        return Err(Error::InvalidRequest(
            "schedule must run on at least one day".to_string(),
        ));
    }

    validate_hour("schedule start", request.start_hour)?;
    validate_hour("schedule stop", request.stop_hour)?;

    if request.time_zone.trim().is_empty() {
        return Err(Error::InvalidRequest(
            "schedule time zone cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate a batch before submission.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the name is blank, no recipient is given,
/// or a recipient appears twice.
pub fn validate_batch(name: &str, recipients: &[BatchRecipient]) -> Result<()> {
    validate_name("batch name", name)?;
    validate_recipients(recipients)
}

/// Validate a direct send.
pub fn validate_direct_send(request: &DirectSend) -> Result<()> {
    validate_campaign_spec(&request.campaign)?;
    validate_recipients(&request.recipients)
}

/// Validate a sound upload.
pub fn validate_sound(sound: &SoundUpload) -> Result<()> {
    validate_name("sound name", &sound.name)?;
    if sound.data.is_empty() {
        return Err(Error::InvalidRequest("sound data cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_recipients(recipients: &[BatchRecipient]) -> Result<()> {
    if recipients.is_empty() {
        return Err(Error::InvalidRequest(
            "at least one recipient is required".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    for recipient in recipients {
        if recipient.id.as_str().trim().is_empty() {
            return Err(Error::InvalidRequest(
                "recipient identifier cannot be empty".to_string(),
            ));
        }
        if !seen.insert(&recipient.id) {
            return Err(Error::InvalidRequest(format!(
                "recipient {} appears more than once",
                recipient.id
            )));
        }
    }

    Ok(())
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{what} cannot be empty")));
    }
    Ok(())
}

fn validate_hour(what: &str, hour: u8) -> Result<()> {
    if hour > MAX_HOUR {
        return Err(Error::InvalidRequest(format!(
            "{what} hour must be between 0 and {MAX_HOUR}, got {hour}"
        )));
    }
    Ok(())
}
