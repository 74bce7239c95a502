//! High-level entry point tying the components together

use crate::campaign::CampaignBuilder;
use crate::cleanup::ScheduleCleanup;
use crate::config::RunConfig;
use crate::dispatch::BatchDispatcher;
use crate::error::Result;
use crate::poller::{CompletionPoller, PollConfig, PollReport};
use crate::recipients::BatchScope;
use blastwave_protocol::{BatchId, BatchRecipient, CampaignId, Channel, DirectSend};
use blastwave_transport::{DispatchService, ResourceStore, RestClient};
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of sending recipients and waiting for them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRun {
    /// Campaign the recipients were sent on
    pub campaign_id: CampaignId,

    /// Batch that was created; `None` for direct sends
    pub batch_id: Option<BatchId>,

    /// How the completion poll ended
    pub report: PollReport,
}

/// Facade over a dispatch service and resource store.
///
/// Components are created on first access and shared afterwards.
///
/// # Example
///
/// ```rust,no_run
/// use blastwave::{Broadcaster, RunConfig};
/// use blastwave_protocol::{BatchRecipient, CampaignSpec, Channel, TextConfig};
///
/// # async fn example() -> blastwave::Result<()> {
/// let broadcaster = Broadcaster::from_config(&RunConfig::from_env()?)?;
///
/// let spec = CampaignSpec::builder()
///     .name("Appointment reminders")
///     .delivery(TextConfig::new("See you tomorrow at 10"))
///     .build()?;
/// let campaign_id = broadcaster.campaigns().create_campaign(&spec).await?;
///
/// let run = broadcaster
///     .dispatch_and_await(campaign_id, Channel::Text, "batch 1", &[BatchRecipient::new("15550001")])
///     .await?;
/// println!("complete: {}", run.report.is_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Broadcaster {
    service: Arc<dyn DispatchService>,
    store: Arc<dyn ResourceStore>,
    poll_config: PollConfig,
    cancel: CancellationToken,
    campaigns: OnceLock<CampaignBuilder>,
    dispatcher: OnceLock<BatchDispatcher>,
    cleanup: OnceLock<ScheduleCleanup>,
}

impl Broadcaster {
    /// Create a broadcaster over explicit collaborators.
    pub fn new(service: Arc<dyn DispatchService>, store: Arc<dyn ResourceStore>) -> Self {
        Self {
            service,
            store,
            poll_config: PollConfig::default(),
            cancel: CancellationToken::new(),
            campaigns: OnceLock::new(),
            dispatcher: OnceLock::new(),
            cleanup: OnceLock::new(),
        }
    }

    /// Create a broadcaster backed by one REST client for both roles.
    pub fn from_rest(client: RestClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Create a broadcaster from a run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        Ok(Self::from_rest(config.rest_client()?).with_poll_config(config.poll_config()))
    }

    /// Set the poll bounds used by [`dispatch_and_await`](Self::dispatch_and_await).
    pub fn with_poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    /// Cancel in-flight polls when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Campaign, schedule and sound creation.
    pub fn campaigns(&self) -> &CampaignBuilder {
        self.campaigns
            .get_or_init(|| CampaignBuilder::new(self.service.clone(), self.store.clone()))
    }

    /// Batch submission.
    pub fn dispatcher(&self) -> &BatchDispatcher {
        self.dispatcher
            .get_or_init(|| BatchDispatcher::new(self.service.clone()))
    }

    /// Schedule teardown.
    pub fn cleanup(&self) -> &ScheduleCleanup {
        self.cleanup
            .get_or_init(|| ScheduleCleanup::new(self.store.clone()))
    }

    /// A completion poller for `channel` using this broadcaster's bounds.
    pub fn poller(&self, channel: Channel) -> CompletionPoller {
        CompletionPoller::for_channel(self.service.clone(), channel)
            .with_config(self.poll_config)
            .with_cancellation(self.cancel.clone())
    }

    /// Send a batch on `campaign_id` and wait for every recipient to finish.
    ///
    /// A timeout is reported in the returned run, not as an error.
    pub async fn dispatch_and_await(
        &self,
        campaign_id: CampaignId,
        channel: Channel,
        name: &str,
        recipients: &[BatchRecipient],
    ) -> Result<DispatchRun> {
        let batch_id = self
            .dispatcher()
            .send_batch(name, recipients, campaign_id)
            .await?;

        let report = self
            .poller(channel)
            .await_completion(campaign_id, batch_id, recipients.iter().map(|r| r.id.clone()))
            .await?;
        log_run(campaign_id, name, &report);

        Ok(DispatchRun {
            campaign_id,
            batch_id: Some(batch_id),
            report,
        })
    }

    /// Create and start a campaign in one call, then wait for its recipients.
    pub async fn send_direct_and_await(&self, request: &DirectSend) -> Result<DispatchRun> {
        let campaign_id = self.dispatcher().send_direct(request).await?;

        let report = self
            .poller(request.campaign.channel())
            .await_completion(
                campaign_id,
                BatchScope::AnyBatch,
                request.recipients.iter().map(|r| r.id.clone()),
            )
            .await?;
        log_run(campaign_id, &request.campaign.name, &report);

        Ok(DispatchRun {
            campaign_id,
            batch_id: None,
            report,
        })
    }
}

fn log_run(campaign_id: CampaignId, name: &str, report: &PollReport) {
    if report.is_complete() {
        info!(campaign_id = %campaign_id, name, "All recipients finished");
    } else {
        let remaining: Vec<&str> = report.remaining.iter().map(|r| r.as_str()).collect();
        warn!(
            campaign_id = %campaign_id,
            name,
            outcome = ?report.outcome,
            remaining = ?remaining,
            "Recipients left unfinished"
        );
    }
}
