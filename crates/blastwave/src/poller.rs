//! Completion polling
//!
//! [`CompletionPoller`] blocks until the dispatch service reports a terminal result
//! for every recipient of a batch, or until a deadline passes. The loop is:
//!
//! 1. wait one interval (the only suspension point),
//! 2. query every status record of the campaign,
//! 3. drop each recipient whose record is terminal and belongs to the batch,
//! 4. stop as soon as nothing is outstanding.
//!
//! Elapsed time advances by the nominal interval per iteration, never by measured
//! wall time, so a slow query can push the real duration past the deadline by up
//! to one round-trip.

use crate::error::{Error, Result};
use crate::observability;
use crate::predicate::{self, TerminalPredicate};
use crate::recipients::{BatchScope, RecipientSet};
use blastwave_protocol::{CampaignId, Channel, RecipientId};
use blastwave_transport::DispatchService;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default wait between status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default deadline for a whole poll
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

/// Deadline and interval of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total nominal time to wait before giving up
    pub max_wait: Duration,

    /// Time to wait before each status query
    pub interval: Duration,
}

impl PollConfig {
    /// Create a poll configuration
    pub fn new(max_wait: Duration, interval: Duration) -> Self {
        Self { max_wait, interval }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// How a poll ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every recipient reached a terminal result
    Complete,
    /// The deadline passed with recipients still outstanding
    TimedOut,
    /// The cancellation token fired
    Cancelled,
}

/// Result of a finished poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// How the poll ended
    pub outcome: PollOutcome,

    /// Recipients still outstanding; empty when complete
    pub remaining: RecipientSet,

    /// Nominal time waited
    pub elapsed: Duration,

    /// Number of status queries issued
    pub polls: u32,
}

impl PollReport {
    /// Whether every recipient finished
    pub fn is_complete(&self) -> bool {
        self.outcome == PollOutcome::Complete
    }
}

/// Nominal time accounting for one poll
#[derive(Debug)]
struct PollState {
    elapsed: Duration,
    deadline: Duration,
    interval: Duration,
    polls: u32,
}

impl PollState {
    fn new(config: PollConfig) -> Self {
        Self {
            elapsed: Duration::ZERO,
            deadline: config.max_wait,
            interval: config.interval,
            polls: 0,
        }
    }

    fn has_time_left(&self) -> bool {
        self.elapsed < self.deadline
    }

    fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(self.interval);
    }
}

/// Waits for a batch to reach terminal results.
///
/// Each poller owns no shared state; polling several campaigns concurrently
/// just means running several `await_completion` calls.
///
/// # Example
///
/// ```rust,no_run
/// # use blastwave::{CompletionPoller, PollConfig};
/// # use blastwave_protocol::{BatchId, CampaignId, Channel};
/// # use blastwave_transport::RestClient;
/// # use std::{sync::Arc, time::Duration};
/// # async fn example(client: RestClient) -> blastwave::Result<()> {
/// let poller = CompletionPoller::for_channel(Arc::new(client), Channel::Text)
///     .with_config(PollConfig::new(Duration::from_secs(120), Duration::from_secs(3)));
///
/// let report = poller
///     .await_completion(CampaignId(42), BatchId(7), ["15550001", "15550002"])
///     .await?;
///
/// if !report.is_complete() {
///     println!("still waiting on {} recipients", report.remaining.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CompletionPoller {
    service: Arc<dyn DispatchService>,
    predicate: Arc<dyn TerminalPredicate>,
    config: PollConfig,
    cancel: CancellationToken,
}

impl CompletionPoller {
    /// Create a poller with an explicit terminal predicate.
    pub fn new(service: Arc<dyn DispatchService>, predicate: Arc<dyn TerminalPredicate>) -> Self {
        Self {
            service,
            predicate,
            config: PollConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a poller using the default predicate of `channel`.
    pub fn for_channel(service: Arc<dyn DispatchService>, channel: Channel) -> Self {
        Self::new(service, predicate::for_channel(channel))
    }

    /// Set the deadline and interval.
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Abort polls when `token` is cancelled.
    ///
    /// A cancelled token cuts the current wait short and the poll returns
    /// [`PollOutcome::Cancelled`] before issuing another query.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Current poll configuration.
    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Wait until every recipient in `recipients` is terminal within `scope`.
    ///
    /// Returns a report whose outcome is `Complete`, `TimedOut` or `Cancelled`;
    /// only remote faults and protocol violations are errors. An empty recipient
    /// list completes immediately without querying.
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if a status query fails (not retried)
    /// - [`Error::ProtocolViolation`] if a query returns no records at all
    /// - [`Error::InvalidRequest`] if the poll interval is zero
    pub async fn await_completion<I, R>(
        &self,
        campaign_id: CampaignId,
        scope: impl Into<BatchScope>,
        recipients: I,
    ) -> Result<PollReport>
    where
        I: IntoIterator<Item = R>,
        R: Into<RecipientId>,
    {
        self.poll(campaign_id, scope.into(), recipients.into_iter().collect())
            .await
    }

    /// Same as [`await_completion`](Self::await_completion) for an already-built set.
    #[tracing::instrument(skip(self, campaign_id, outstanding), fields(campaign_id = %campaign_id, outstanding = outstanding.len()))]
    pub async fn poll(
        &self,
        campaign_id: CampaignId,
        scope: BatchScope,
        mut outstanding: RecipientSet,
    ) -> Result<PollReport> {
        let mut state = PollState::new(self.config);

        if outstanding.is_empty() {
            return Ok(self.finish(campaign_id, PollOutcome::Complete, outstanding, &state));
        }
        if state.interval.is_zero() {
            return Err(Error::InvalidRequest(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        observability::log_poll_started(campaign_id, scope, outstanding.len());

        while state.has_time_left() {
            if self.cancel.is_cancelled() {
                return Ok(self.finish(campaign_id, PollOutcome::Cancelled, outstanding, &state));
            }

            tokio::select! {
                _ = tokio::time::sleep(state.interval) => {}
                _ = self.cancel.cancelled() => {
                    debug!(campaign_id = %campaign_id, "Poll wait interrupted");
                }
            }
            state.advance();

            if self.cancel.is_cancelled() {
                return Ok(self.finish(campaign_id, PollOutcome::Cancelled, outstanding, &state));
            }

            let records = self.service.query_status(campaign_id).await?;
            state.polls += 1;

            if records.is_empty() {
                return Err(Error::ProtocolViolation { campaign_id });
            }

            let resolved = outstanding.reconcile(&records, scope, self.predicate.as_ref());
            for recipient in &resolved {
                observability::log_recipient_resolved(campaign_id, recipient);
            }
            observability::log_poll_tick(campaign_id, state.polls, records.len(), outstanding.len());

            if outstanding.is_empty() {
                return Ok(self.finish(campaign_id, PollOutcome::Complete, outstanding, &state));
            }
        }

        Ok(self.finish(campaign_id, PollOutcome::TimedOut, outstanding, &state))
    }

    fn finish(
        &self,
        campaign_id: CampaignId,
        outcome: PollOutcome,
        remaining: RecipientSet,
        state: &PollState,
    ) -> PollReport {
        let report = PollReport {
            outcome,
            remaining,
            elapsed: state.elapsed,
            polls: state.polls,
        };
        observability::log_poll_finished(campaign_id, &report);
        report
    }
}

impl std::fmt::Debug for CompletionPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionPoller")
            .field("service", &self.service)
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blastwave_protocol::{
        BatchId, CampaignSpec, DirectSend, DispatchFault, NewBatch, StatusRecord, TerminalResult,
    };
    use std::sync::Mutex;

    /// Returns the same snapshot on every query and counts calls.
    #[derive(Debug, Default)]
    struct FixedStatus {
        records: Vec<StatusRecord>,
        queries: Mutex<u32>,
    }

    #[async_trait]
    impl DispatchService for FixedStatus {
        async fn create_campaign(&self, _spec: &CampaignSpec) -> std::result::Result<CampaignId, DispatchFault> {
            unimplemented!()
        }

        async fn create_batch(&self, _batch: &NewBatch) -> std::result::Result<BatchId, DispatchFault> {
            unimplemented!()
        }

        async fn start_campaign(&self, _campaign_id: CampaignId) -> std::result::Result<(), DispatchFault> {
            unimplemented!()
        }

        async fn query_status(
            &self,
            _campaign_id: CampaignId,
        ) -> std::result::Result<Vec<StatusRecord>, DispatchFault> {
            *self.queries.lock().unwrap() += 1;
            Ok(self.records.clone())
        }

        async fn send_direct(&self, _request: &DirectSend) -> std::result::Result<CampaignId, DispatchFault> {
            unimplemented!()
        }
    }

    fn poller(service: Arc<FixedStatus>, config: PollConfig) -> CompletionPoller {
        CompletionPoller::for_channel(service, Channel::Text).with_config(config)
    }

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(config.max_wait, Duration::from_secs(60));
    }

    #[test]
    fn test_poll_state_advances_by_interval() {
        let mut state = PollState::new(PollConfig::new(Duration::from_secs(5), Duration::from_secs(2)));
        assert!(state.has_time_left());
        state.advance();
        state.advance();
        assert_eq!(state.elapsed, Duration::from_secs(4));
        assert!(state.has_time_left());
        state.advance();
        assert!(!state.has_time_left());
    }

    #[test]
    fn test_poll_state_saturates_instead_of_overflowing() {
        let mut state = PollState::new(PollConfig::new(Duration::MAX, Duration::MAX / 2));
        state.advance();
        state.advance();
        state.advance();
        assert_eq!(state.elapsed, Duration::MAX);
        assert!(!state.has_time_left());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_wait_with_huge_interval_times_out() {
        let service = Arc::new(FixedStatus {
            records: vec![StatusRecord::pending("a", BatchId(1))],
            ..Default::default()
        });
        let config = PollConfig::new(Duration::MAX, Duration::MAX / 2 + Duration::from_secs(1));

        let report = poller(service.clone(), config)
            .await_completion(CampaignId(1), BatchId(1), ["a"])
            .await
            .unwrap();

        assert_eq!(report.outcome, PollOutcome::TimedOut);
        assert_eq!(report.elapsed, Duration::MAX);
        assert_eq!(report.polls, 2);
        assert_eq!(*service.queries.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_recipients_complete_without_query() {
        let service = Arc::new(FixedStatus::default());
        let report = poller(service.clone(), PollConfig::default())
            .await_completion(CampaignId(1), BatchId(1), Vec::<RecipientId>::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, PollOutcome::Complete);
        assert_eq!(report.polls, 0);
        assert_eq!(report.elapsed, Duration::ZERO);
        assert_eq!(*service.queries.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_wait_times_out_without_query() {
        let service = Arc::new(FixedStatus::default());
        let report = poller(service.clone(), PollConfig::new(Duration::ZERO, Duration::from_secs(1)))
            .await_completion(CampaignId(1), BatchId(1), ["a"])
            .await
            .unwrap();

        assert_eq!(report.outcome, PollOutcome::TimedOut);
        assert_eq!(report.polls, 0);
        assert!(report.remaining.contains(&RecipientId::from("a")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_rejected() {
        let service = Arc::new(FixedStatus::default());
        let err = poller(service, PollConfig::new(Duration::from_secs(1), Duration::ZERO))
            .await_completion(CampaignId(1), BatchId(1), ["a"])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_delivered_record_completes_on_first_poll() {
        let service = Arc::new(FixedStatus {
            records: vec![StatusRecord::finished("a", BatchId(1), TerminalResult::Delivered)],
            ..Default::default()
        });
        let report = poller(service, PollConfig::default())
            .await_completion(CampaignId(1), BatchId(1), ["a"])
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.polls, 1);
        assert_eq!(report.elapsed, DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_token_skips_queries() {
        let service = Arc::new(FixedStatus::default());
        let token = CancellationToken::new();
        token.cancel();

        let report = poller(service.clone(), PollConfig::default())
            .with_cancellation(token)
            .await_completion(CampaignId(1), BatchId(1), ["a", "b"])
            .await
            .unwrap();

        assert_eq!(report.outcome, PollOutcome::Cancelled);
        assert_eq!(report.remaining.len(), 2);
        assert_eq!(*service.queries.lock().unwrap(), 0);
    }
}
