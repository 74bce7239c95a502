//! Run configuration for campaign drivers

use crate::error::{Error, Result};
use crate::poller::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, PollConfig};
use blastwave_protocol::RecipientId;
use blastwave_transport::RestClient;
use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

/// Default time zone for schedules
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Target deployment of the dispatch service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Sandbox deployment
    #[default]
    Development,
    /// Live deployment
    Production,
}

impl Environment {
    /// Base URL of the deployment
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Development => "https://dev.api.blastwave.io/v1",
            Self::Production => "https://api.blastwave.io/v1",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(Error::InvalidConfig(format!("unknown environment '{other}'"))),
        }
    }
}

/// Settings for one driver run.
///
/// Holds the service credentials, polling bounds, the time zone used for
/// schedules and the recipient batches to send.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Service user name
    pub user: String,

    /// Service password
    pub password: SecretString,

    /// Target deployment
    pub environment: Environment,

    /// Overrides the deployment's base URL
    pub base_url: Option<String>,

    /// Deadline for each completion poll
    pub max_wait: Duration,

    /// Wait between status queries
    pub poll_interval: Duration,

    /// Time zone for schedules
    pub time_zone: String,

    /// Recipient batches, in send order
    pub contact_batches: Vec<Vec<RecipientId>>,
}

impl RunConfig {
    /// Create a configuration with the given credentials and default settings.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: SecretString::new(password.into().into_boxed_str()),
            environment: Environment::default(),
            base_url: None,
            max_wait: DEFAULT_MAX_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            contact_batches: Vec::new(),
        }
    }

    /// Start building a configuration.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present. Reads:
    /// - `BLASTWAVE_USER` and `BLASTWAVE_PASSWORD` (required)
    /// - `BLASTWAVE_ENVIRONMENT`: `development` or `production`
    /// - `BLASTWAVE_BASE_URL`: overrides the environment's URL
    /// - `BLASTWAVE_MAX_WAIT_MS` and `BLASTWAVE_POLL_INTERVAL_MS`
    /// - `BLASTWAVE_TIME_ZONE`
    /// - `BLASTWAVE_CONTACTS_BATCH_1`, `BLASTWAVE_CONTACTS_BATCH_2`, ...: comma
    ///   separated recipients, read until the first missing index
    ///
    /// # Errors
    ///
    /// `Error::MissingConfig` if a credential is unset; `Error::InvalidConfig` if a
    /// number or the environment name does not parse.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let user = env::var("BLASTWAVE_USER")
            .map_err(|_| Error::MissingConfig("BLASTWAVE_USER".to_string()))?;
        let password = env::var("BLASTWAVE_PASSWORD")
            .map_err(|_| Error::MissingConfig("BLASTWAVE_PASSWORD".to_string()))?;

        let mut config = Self::new(user, password);

        if let Ok(environment) = env::var("BLASTWAVE_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }

        if let Ok(base_url) = env::var("BLASTWAVE_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(max_wait) = env::var("BLASTWAVE_MAX_WAIT_MS") {
            config.max_wait = parse_millis("BLASTWAVE_MAX_WAIT_MS", &max_wait)?;
        }

        if let Ok(interval) = env::var("BLASTWAVE_POLL_INTERVAL_MS") {
            config.poll_interval = parse_millis("BLASTWAVE_POLL_INTERVAL_MS", &interval)?;
        }

        if let Ok(time_zone) = env::var("BLASTWAVE_TIME_ZONE") {
            config.time_zone = time_zone;
        }

        let mut index = 1;
        while let Ok(contacts) = env::var(format!("BLASTWAVE_CONTACTS_BATCH_{index}")) {
            config.contact_batches.push(parse_contacts(&contacts));
            index += 1;
        }

        Ok(config)
    }

    /// Base URL in effect: the override if set, else the environment's.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// Poll bounds for [`CompletionPoller`](crate::CompletionPoller).
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(self.max_wait, self.poll_interval)
    }

    /// Build a REST client for the configured deployment.
    pub fn rest_client(&self) -> Result<RestClient> {
        let client = RestClient::builder()
            .base_url(self.effective_base_url())
            .secret_credentials(self.user.clone(), self.password.clone())
            .build()?;
        Ok(client)
    }
}

fn parse_millis(name: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| Error::InvalidConfig(format!("{name} must be a number of milliseconds, got '{value}'")))
}

/// Split a comma separated recipient list, dropping blanks.
pub fn parse_contacts(value: &str) -> Vec<RecipientId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|contact| !contact.is_empty())
        .map(RecipientId::from)
        .collect()
}

/// Builder for [`RunConfig`].
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    user: Option<String>,
    password: Option<SecretString>,
    environment: Environment,
    base_url: Option<String>,
    max_wait: Option<Duration>,
    poll_interval: Option<Duration>,
    time_zone: Option<String>,
    contact_batches: Vec<Vec<RecipientId>>,
}

impl RunConfigBuilder {
    /// Set the credentials.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    /// Set the target deployment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the poll deadline.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Set the poll interval.
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    /// Set the schedule time zone.
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Append a recipient batch.
    pub fn contact_batch<I, R>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RecipientId>,
    {
        self.contact_batches
            .push(contacts.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// `Error::MissingConfig` if no credentials were set.
    pub fn build(self) -> Result<RunConfig> {
        let user = self
            .user
            .ok_or_else(|| Error::MissingConfig("user".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| Error::MissingConfig("password".to_string()))?;

        Ok(RunConfig {
            user,
            password,
            environment: self.environment,
            base_url: self.base_url,
            max_wait: self.max_wait.unwrap_or(DEFAULT_MAX_WAIT),
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            time_zone: self
                .time_zone
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
            contact_batches: self.contact_batches,
        })
    }
}
