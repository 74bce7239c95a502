//! Campaign creation

use crate::error::{Error, Result};
use crate::validation;
use blastwave_protocol::{
    CampaignId, CampaignSpec, Schedule, ScheduleId, ScheduleRequest, SoundId, SoundUpload,
};
use blastwave_transport::{DispatchService, ResourceStore};
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

/// Ids of a campaign created together with its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCampaign {
    /// The new campaign
    pub campaign_id: CampaignId,
    /// The schedule attached to it
    pub schedule_id: ScheduleId,
}

/// Creates campaigns, their schedules and the sounds voice campaigns play.
///
/// Nothing is rolled back on failure: if the schedule cannot be created the
/// campaign already exists and its removal is left to the caller.
#[derive(Debug, Clone)]
pub struct CampaignBuilder {
    service: Arc<dyn DispatchService>,
    store: Arc<dyn ResourceStore>,
}

impl CampaignBuilder {
    /// Create a builder over the given collaborators.
    pub fn new(service: Arc<dyn DispatchService>, store: Arc<dyn ResourceStore>) -> Self {
        Self { service, store }
    }

    /// Create a campaign without a schedule.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRequest` if the campaign fails validation
    /// - `Error::Remote` if the service rejects it
    #[tracing::instrument(skip(self, spec), fields(name = %spec.name, channel = ?spec.channel()))]
    pub async fn create_campaign(&self, spec: &CampaignSpec) -> Result<CampaignId> {
        validation::validate_campaign_spec(spec)?;

        let campaign_id = self.service.create_campaign(spec).await?;
        info!(campaign_id = %campaign_id, name = %spec.name, "Campaign created");
        Ok(campaign_id)
    }

    /// Create a campaign and attach a recurring schedule to it.
    ///
    /// The end date, if any, is counted in whole weeks from today (UTC).
    #[tracing::instrument(skip(self, spec, request), fields(name = %spec.name))]
    pub async fn create_scheduled_campaign(
        &self,
        spec: &CampaignSpec,
        request: &ScheduleRequest,
    ) -> Result<ScheduledCampaign> {
        validation::validate_campaign_spec(spec)?;
        validation::validate_schedule_request(request)?;

        let campaign_id = self.service.create_campaign(spec).await?;
        let schedule = schedule_for(campaign_id, request, Utc::now().date_naive())?;
        let schedule_id = self.store.create_schedule(&schedule).await?;

        info!(
            campaign_id = %campaign_id,
            schedule_id = %schedule_id,
            end_date = ?schedule.end_date,
            "Scheduled campaign created"
        );
        Ok(ScheduledCampaign {
            campaign_id,
            schedule_id,
        })
    }

    /// Upload a sound for use in a voice campaign.
    #[tracing::instrument(skip(self, sound), fields(name = %sound.name, bytes = sound.data.len()))]
    pub async fn upload_sound(&self, sound: SoundUpload) -> Result<SoundId> {
        validation::validate_sound(&sound)?;

        let sound_id = self.store.create_sound(&sound).await?;
        info!(sound_id = %sound_id, name = %sound.name, "Sound uploaded");
        Ok(sound_id)
    }
}

/// Build the schedule resource for `campaign_id`, counting the end date from `today`.
pub(crate) fn schedule_for(
    campaign_id: CampaignId,
    request: &ScheduleRequest,
    today: NaiveDate,
) -> Result<Schedule> {
    let end_date = match request.end_after_weeks {
        Some(weeks) => Some(
            today
                .checked_add_signed(Duration::weeks(i64::from(weeks)))
                .ok_or_else(|| {
                    Error::InvalidRequest(format!("schedule end of {weeks} weeks is out of range"))
                })?,
        ),
        None => None,
    };

    Ok(Schedule {
        id: None,
        campaign_id,
        days: request.days.clone(),
        start_hour: request.start_hour,
        stop_hour: request.stop_hour,
        time_zone: request.time_zone.clone(),
        end_date,
    })
}
