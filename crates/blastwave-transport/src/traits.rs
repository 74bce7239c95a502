//! Collaborator traits consumed by the dispatch engine
//!
//! Both traits are object safe and are held as `Arc<dyn ...>` by the engine.
//! Implementations must tolerate concurrent independent calls; the engine never
//! issues overlapping calls for the same campaign.

use async_trait::async_trait;
use blastwave_protocol::{
    BatchId, CampaignId, CampaignSpec, DirectSend, DispatchFault, NewBatch, Schedule, ScheduleId,
    ScheduleLookup, SoundId, SoundUpload, StatusRecord,
};
use std::fmt;

/// Remote service that runs campaigns.
#[async_trait]
pub trait DispatchService: Send + Sync + fmt::Debug {
    /// Create a campaign and return its id.
    async fn create_campaign(&self, spec: &CampaignSpec) -> Result<CampaignId, DispatchFault>;

    /// Attach a batch of recipients to an existing campaign.
    async fn create_batch(&self, batch: &NewBatch) -> Result<BatchId, DispatchFault>;

    /// Issue the start command for a campaign.
    async fn start_campaign(&self, campaign_id: CampaignId) -> Result<(), DispatchFault>;

    /// Fetch every status record of a campaign, across all of its batches.
    async fn query_status(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<StatusRecord>, DispatchFault>;

    /// Create a campaign with its recipients and start it in one call.
    async fn send_direct(&self, request: &DirectSend) -> Result<CampaignId, DispatchFault>;
}

/// Remote store of campaign sub-resources.
#[async_trait]
pub trait ResourceStore: Send + Sync + fmt::Debug {
    /// Create a schedule for `schedule.campaign_id` and return its id.
    async fn create_schedule(&self, schedule: &Schedule) -> Result<ScheduleId, DispatchFault>;

    /// Delete a schedule.
    async fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<(), DispatchFault>;

    /// Look a schedule up. A missing schedule is `Ok(ScheduleLookup::NotFound)`.
    async fn get_schedule(&self, schedule_id: ScheduleId) -> Result<ScheduleLookup, DispatchFault>;

    /// Upload a sound for use by voice campaigns.
    async fn create_sound(&self, sound: &SoundUpload) -> Result<SoundId, DispatchFault>;
}
