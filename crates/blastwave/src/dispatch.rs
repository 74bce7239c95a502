//! Batch submission

use crate::error::{Error, Result};
use crate::validation;
use blastwave_protocol::{BatchId, BatchRecipient, CampaignId, DirectSend, NewBatch};
use blastwave_transport::DispatchService;
use std::sync::Arc;
use tracing::{error, info};

/// Submits recipients to campaigns and starts them.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    service: Arc<dyn DispatchService>,
}

impl BatchDispatcher {
    /// Create a dispatcher over `service`.
    pub fn new(service: Arc<dyn DispatchService>) -> Self {
        Self { service }
    }

    /// Attach a named batch to `campaign_id` and start the campaign.
    ///
    /// Batch creation and the start command are separate remote calls. If the
    /// batch is created but the start fails, the batch stays in place and the
    /// error carries its id.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRequest` for a blank name, no recipients, or a repeated recipient
    /// - `Error::Remote` if the batch cannot be created
    /// - `Error::StartFailed` if the batch exists but the campaign did not start
    #[tracing::instrument(skip(self, recipients, campaign_id), fields(campaign_id = %campaign_id, recipients = recipients.len()))]
    pub async fn send_batch(
        &self,
        name: &str,
        recipients: &[BatchRecipient],
        campaign_id: CampaignId,
    ) -> Result<BatchId> {
        validation::validate_batch(name, recipients)?;

        let batch = NewBatch {
            name: name.to_string(),
            campaign_id,
            recipients: recipients.to_vec(),
            scrub_duplicates: false,
        };
        let batch_id = self.service.create_batch(&batch).await?;
        info!(campaign_id = %campaign_id, batch_id = %batch_id, name, "Batch created");

        if let Err(fault) = self.service.start_campaign(campaign_id).await {
            error!(
                campaign_id = %campaign_id,
                batch_id = %batch_id,
                fault = %fault,
                "Campaign failed to start after batch creation"
            );
            return Err(Error::StartFailed {
                campaign_id,
                batch_id,
                fault,
            });
        }

        info!(campaign_id = %campaign_id, batch_id = %batch_id, "Campaign started");
        Ok(batch_id)
    }

    /// Create, populate and start a campaign in a single call.
    ///
    /// The service does not report the batch it creates, so status for the
    /// returned campaign has to be tracked with [`BatchScope::AnyBatch`](crate::BatchScope::AnyBatch).
    #[tracing::instrument(skip(self, request), fields(name = %request.campaign.name, recipients = request.recipients.len()))]
    pub async fn send_direct(&self, request: &DirectSend) -> Result<CampaignId> {
        validation::validate_direct_send(request)?;

        let campaign_id = self.service.send_direct(request).await?;
        info!(campaign_id = %campaign_id, "Direct send started");
        Ok(campaign_id)
    }
}

