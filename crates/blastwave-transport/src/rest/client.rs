//! REST client implementation
//!
//! Maps each collaborator operation onto one HTTP call and every non-2xx
//! answer onto a [`DispatchFault`]. Calls are never retried here.

use crate::error::{Result, TransportError};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata, log_transport_failure};
use crate::traits::{DispatchService, ResourceStore};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use blastwave_protocol::{
    BatchId, CampaignId, CampaignSpec, DirectSend, DispatchFault, FaultCode, NewBatch, Schedule,
    ScheduleId, ScheduleLookup, SoundId, SoundUpload, StatusRecord,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};
use url::Url;

/// Result of a single remote call
type FaultResult<T> = std::result::Result<T, DispatchFault>;

/// Default timeout for a single remote call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the dispatch service.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use blastwave_transport::RestClient;
///
/// let client = RestClient::builder()
///     .base_url("https://dev.api.blastwave.io/v1")
///     .credentials("user", "password")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Base URL, always ending in `/`
    base_url: Url,
    /// Basic auth user
    user: String,
    /// Basic auth password
    password: SecretString,
}

/// Raw answer of one call
struct Reply {
    status: u16,
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct Created {
    id: u64,
}

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<StatusRecord>,
}

#[derive(Deserialize)]
struct FaultEnvelope {
    fault: DispatchFault,
}

#[derive(Serialize)]
struct ControlCommand {
    command: &'static str,
}

#[derive(Serialize)]
struct SoundBody<'a> {
    name: &'a str,
    data: String,
}

impl RestClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Base URL the client sends requests to.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    async fn call<B>(&self, method: Method, path: &str, body: Option<&B>) -> FaultResult<Reply>
    where
        B: Serialize + ?Sized,
    {
        let url = self.inner.base_url.join(path).map_err(|e| {
            DispatchFault::new(
                FaultCode::Validation,
                format!("Failed to construct URL from path '{}': {}", path, e),
            )
        })?;

        let mut metadata = RequestMetadata::new(method.as_str(), path);
        let mut request = self
            .inner
            .http_client
            .request(method, url)
            .basic_auth(&self.inner.user, Some(self.inner.password.expose_secret()));

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                DispatchFault::new(FaultCode::Validation, format!("Failed to encode request: {}", e))
            })?;
            metadata = metadata.with_body_size(bytes.len());
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        metadata.log_request();
        let timer = RequestTimer::start();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log_transport_failure(&metadata, timer.elapsed(), &e.to_string());
                return Err(DispatchFault::transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DispatchFault::transport(e.to_string()))?
            .to_vec();

        let response_metadata = ResponseMetadata::new(status, body.len(), timer.elapsed());
        if (200..300).contains(&status) {
            response_metadata.log_success(&metadata);
        } else {
            response_metadata.log_fault(&metadata, &String::from_utf8_lossy(&body));
        }

        Ok(Reply { status, body })
    }

    async fn create<B>(&self, path: &str, body: &B) -> FaultResult<u64>
    where
        B: Serialize + ?Sized,
    {
        let created: Created = parse(self.call(Method::POST, path, Some(body)).await?)?;
        Ok(created.id)
    }
}

/// Turn a reply into a typed value, or into the fault it carries.
fn parse<T: DeserializeOwned>(reply: Reply) -> FaultResult<T> {
    expect_success(&reply)?;
    serde_json::from_slice(&reply.body).map_err(|e| {
        DispatchFault::new(
            FaultCode::Other("MALFORMED_RESPONSE".to_string()),
            format!("Failed to parse response: {}", e),
        )
    })
}

fn expect_success(reply: &Reply) -> FaultResult<()> {
    if (200..300).contains(&reply.status) {
        Ok(())
    } else {
        Err(fault_from_response(reply.status, &reply.body))
    }
}

/// Build a fault from an error response.
///
/// A `{"fault": {...}}` body takes precedence; otherwise the status code decides.
pub(crate) fn fault_from_response(status: u16, body: &[u8]) -> DispatchFault {
    if let Ok(envelope) = serde_json::from_slice::<FaultEnvelope>(body) {
        return envelope.fault;
    }
    DispatchFault::new(
        FaultCode::from_status(status),
        String::from_utf8_lossy(body).into_owned(),
    )
}

#[async_trait]
impl DispatchService for RestClient {
    async fn create_campaign(&self, spec: &CampaignSpec) -> FaultResult<CampaignId> {
        self.create("broadcasts", spec).await.map(CampaignId)
    }

    async fn create_batch(&self, batch: &NewBatch) -> FaultResult<BatchId> {
        let path = format!("broadcasts/{}/batches", batch.campaign_id);
        self.create(&path, batch).await.map(BatchId)
    }

    async fn start_campaign(&self, campaign_id: CampaignId) -> FaultResult<()> {
        let path = format!("broadcasts/{}/control", campaign_id);
        let reply = self
            .call(Method::POST, &path, Some(&ControlCommand { command: "START" }))
            .await?;
        expect_success(&reply)
    }

    async fn query_status(
        &self,
        campaign_id: CampaignId,
    ) -> FaultResult<Vec<StatusRecord>> {
        let path = format!("broadcasts/{}/records", campaign_id);
        let list: RecordList = parse(self.call::<()>(Method::GET, &path, None).await?)?;
        Ok(list.records)
    }

    async fn send_direct(&self, request: &DirectSend) -> FaultResult<CampaignId> {
        self.create("broadcasts/send", request).await.map(CampaignId)
    }
}

#[async_trait]
impl ResourceStore for RestClient {
    async fn create_schedule(&self, schedule: &Schedule) -> FaultResult<ScheduleId> {
        let path = format!("broadcasts/{}/schedules", schedule.campaign_id);
        self.create(&path, schedule).await.map(ScheduleId)
    }

    async fn delete_schedule(&self, schedule_id: ScheduleId) -> FaultResult<()> {
        let path = format!("schedules/{}", schedule_id);
        let reply = self.call::<()>(Method::DELETE, &path, None).await?;
        expect_success(&reply)
    }

    async fn get_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> FaultResult<ScheduleLookup> {
        let path = format!("schedules/{}", schedule_id);
        match parse::<Schedule>(self.call::<()>(Method::GET, &path, None).await?) {
            Ok(schedule) => Ok(ScheduleLookup::Found(schedule)),
            Err(fault) if fault.is_not_found() => Ok(ScheduleLookup::NotFound),
            Err(fault) => Err(fault),
        }
    }

    async fn create_sound(&self, sound: &SoundUpload) -> FaultResult<SoundId> {
        let body = SoundBody {
            name: &sound.name,
            data: STANDARD.encode(&sound.data),
        };
        self.create("sounds", &body).await.map(SoundId)
    }
}

/// Builder for creating a [`RestClient`].
///
/// # Example
///
/// ```rust,no_run
/// use blastwave_transport::RestClient;
/// use std::time::Duration;
///
/// let client = RestClient::builder()
///     .base_url("https://api.blastwave.io/v1")
///     .credentials("user", "password")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct RestClientBuilder {
    base_url: Option<String>,
    user: Option<String>,
    password: Option<SecretString>,
    timeout: Option<Duration>,
}

impl RestClientBuilder {
    /// Set the base URL of the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the basic auth credentials.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    /// Set the basic auth credentials from an already-secret password.
    pub fn secret_credentials(mut self, user: impl Into<String>, password: SecretString) -> Self {
        self.user = Some(user.into());
        self.password = Some(password);
        self
    }

    /// Set the timeout for a single call.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credentials are missing, the base URL
    /// does not parse, or the HTTP client cannot be created.
    pub fn build(self) -> Result<RestClient> {
        let base_url = self
            .base_url
            .ok_or(TransportError::MissingConfig("base_url"))?;
        let user = self.user.ok_or(TransportError::MissingConfig("user"))?;
        let password = self
            .password
            .ok_or(TransportError::MissingConfig("password"))?;

        // Url::join drops the last segment unless the base ends with a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(&base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(RestClient {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                user,
                password,
            }),
        })
    }
}
