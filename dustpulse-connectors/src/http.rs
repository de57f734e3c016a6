//! HTTP/HTTPS Sink - REST Ingestion of Measurements
//!
//! ## Overview
//!
//! Each measurement becomes one `POST` with a JSON body:
//!
//! ```json
//! {
//!   "concentration_pcs": 10658.12,
//!   "concentration_ugm3": 22.16,
//!   "aqi": 72,
//!   "created_at_ms": 1760572800000,
//!   "device_id": "balcony-01"
//! }
//! ```
//!
//! `device_id` is omitted when not configured.
//!
//! ## Retry Policy
//!
//! | Outcome | Retried | Reported as |
//! |---------|---------|-------------|
//! | 2xx | - | success |
//! | 408, 429, 5xx | yes | `SinkError::Unavailable` once retries run out |
//! | other 4xx | no | `SinkError::Rejected` |
//! | connect / DNS / timeout | yes | `SinkError::Unavailable` once retries run out |
//!
//! Delays double from `retry_base` up to `max_backoff`:
//!
//! ```text
//! attempt:   0     1      2      3
//! delay:     -   base  2·base  4·base   (capped)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dustpulse_connectors::http::{HttpConfig, HttpSink};
//! use dustpulse_core::events::Measurement;
//! use dustpulse_core::traits::MeasurementSink;
//!
//! let config = HttpConfig::new("https://air.example.net/api/v1/pm25")
//!     .api_key("X-Api-Key", "secret")
//!     .device_id("balcony-01")
//!     .timeout_secs(10);
//!
//! let mut sink = HttpSink::new(config)?;
//! sink.store(&Measurement { concentration_pcs: 812.4, concentration_ugm3: 1.69, aqi: 7 })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use thiserror::Error;

use dustpulse_core::errors::{SinkError, SinkResult};
use dustpulse_core::events::Measurement;
use dustpulse_core::traits::MeasurementSink;

use crate::ConnectionStats;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::Request(_) => true,
            HttpError::ServerError { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            HttpError::Serialization(_) | HttpError::Config(_) => false,
        }
    }
}

impl From<&HttpError> for SinkError {
    fn from(err: &HttpError) -> Self {
        match err {
            HttpError::Request(_) => SinkError::Unavailable { reason: "http request failed" },
            HttpError::ServerError { .. } if err.is_retryable() => {
                SinkError::Unavailable { reason: "http server error" }
            }
            HttpError::ServerError { .. } => SinkError::Rejected { reason: "http client error" },
            HttpError::Serialization(_) => SinkError::Serialization,
            HttpError::Config(_) => SinkError::Rejected { reason: "http sink misconfigured" },
        }
    }
}

/// Authentication methods
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic { username: String, password: String },
    /// API key in header
    ApiKey { header: String, value: String },
}

impl AuthMethod {
    /// Header carrying the credentials, if any
    pub fn header(&self) -> Option<(String, String)> {
        match self {
            AuthMethod::None => None,
            AuthMethod::Bearer(token) => Some(("Authorization".into(), format!("Bearer {}", token))),
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                Some(("Authorization".into(), format!("Basic {}", credentials)))
            }
            AuthMethod::ApiKey { header, value } => Some((header.clone(), value.clone())),
        }
    }
}

// Credentials stay out of logs
impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::None => write!(f, "None"),
            AuthMethod::Bearer(_) => write!(f, "Bearer(***)"),
            AuthMethod::Basic { username, .. } => write!(f, "Basic({}:***)", username),
            AuthMethod::ApiKey { header, .. } => write!(f, "ApiKey({}: ***)", header),
        }
    }
}

/// HTTP sink configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Full URL measurements are posted to
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: Vec<(String, String)>,
    /// Attempts after the first
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_base: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
    /// Identifies this sensor to the backend
    pub device_id: Option<String>,
    /// User agent string
    pub user_agent: String,
}

impl HttpConfig {
    /// Create new configuration posting to `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            auth: AuthMethod::None,
            headers: Vec::new(),
            max_retries: 3,
            retry_base: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
            device_id: None,
            user_agent: format!("DustPulse/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn backoff(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base = base;
        self.max_backoff = max;
        self
    }

    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Delay before attempt number `attempt` (the first attempt is 0)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.retry_base.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Request body for one measurement
#[derive(Debug, Serialize)]
struct Reading<'a> {
    #[serde(flatten)]
    measurement: &'a Measurement,
    created_at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<&'a str>,
}

/// Measurement sink posting JSON to a REST endpoint
pub struct HttpSink {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpSink {
    /// Create new HTTP sink
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        // Validate endpoint
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(HttpError::Config("Endpoint must start with http:// or https://".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Post one measurement, retrying transient failures
    pub fn post(&mut self, measurement: &Measurement) -> Result<(), HttpError> {
        let body = self.body(measurement)?;

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                self.stats.retries += 1;
                thread::sleep(self.config.backoff_delay(attempt));
            }

            match self.send_once(&body) {
                Ok(()) => {
                    self.stats.messages_sent += 1;
                    self.stats.bytes_sent += body.len() as u64;
                    return Ok(());
                }
                Err(err) if err.is_retryable() => {
                    log::debug!("Attempt {} to {} failed: {}", attempt + 1, self.config.endpoint, err);
                    last_error = Some(err);
                }
                Err(err) => return Err(self.fail(err)),
            }
        }

        // All retries exhausted
        let err = last_error.unwrap_or_else(|| HttpError::Request("Unknown error".into()));
        Err(self.fail(err))
    }

    fn body(&self, measurement: &Measurement) -> Result<String, HttpError> {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let reading = Reading {
            measurement,
            created_at_ms,
            device_id: self.config.device_id.as_deref(),
        };
        serde_json::to_string(&reading).map_err(|e| HttpError::Serialization(e.to_string()))
    }

    fn send_once(&self, body: &str) -> Result<(), HttpError> {
        let mut request = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");

        if let Some((name, value)) = self.config.auth.header() {
            request = request.set(&name, &value);
        }
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        match request.send_string(body) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, resp)) => Err(HttpError::ServerError {
                status,
                message: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(HttpError::Request(e.to_string())),
        }
    }

    fn fail(&mut self, err: HttpError) -> HttpError {
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(err.to_string());
        err
    }
}

impl MeasurementSink for HttpSink {
    fn store(&mut self, measurement: &Measurement) -> SinkResult<()> {
        self.post(measurement).map_err(|err| {
            log::warn!("Measurement not delivered to {}: {}", self.config.endpoint, err);
            SinkError::from(&err)
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
