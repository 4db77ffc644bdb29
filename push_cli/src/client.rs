//! HTTP client for the Pushgateway simple push API.
//!
//! Follows the "simple API" for a single unlabelled metric:
//! `POST <url>metrics/job/<job>` with a `name value\n` body.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("invalid metric: {0}")]
    InvalidMetric(String),

    #[error("push endpoint record is malformed: {0}")]
    MalformedRecord(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The payload published under the `push-endpoint` relation key.
#[derive(Debug, Deserialize)]
struct EndpointPayload {
    url: String,
}

/// Extract the push URL from a published `push-endpoint` record value.
pub fn endpoint_from_record(value: &str) -> Result<String, PushError> {
    let payload: EndpointPayload =
        serde_json::from_str(value).map_err(|e| PushError::MalformedRecord(e.to_string()))?;
    if payload.url.is_empty() {
        return Err(PushError::MalformedRecord(
            "missing push endpoint URL".to_string(),
        ));
    }
    Ok(payload.url)
}

/// Client for one published push endpoint.
pub struct PushClient {
    http: reqwest::Client,
    base_url: String,
}

impl PushClient {
    /// Build a client for the given endpoint URL.
    ///
    /// `insecure` skips TLS certificate verification, for clusters whose CA
    /// has not been distributed to the caller.
    pub fn new(url: &str, insecure: bool) -> Result<Self, PushError> {
        let mut base_url = url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Send a single metric sample.
    pub async fn send(&self, name: &str, value: f64, job: &str) -> Result<(), PushError> {
        validate_metric_name(name)?;
        if !value.is_finite() {
            return Err(PushError::InvalidMetric(
                "the metric value must be a finite number".to_string(),
            ));
        }

        let body = format!("{} {}\n", name, value);
        let url = format!("{}metrics/job/{}", self.base_url, job);
        self.http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Probe the gateway's readiness endpoint.
    pub async fn check(&self) -> Result<(), PushError> {
        let url = format!("{}-/ready", self.base_url);
        self.http.get(&url).send().await?.error_for_status()?;
        Ok(())
    }
}

fn validate_metric_name(name: &str) -> Result<(), PushError> {
    if name.is_empty() {
        return Err(PushError::InvalidMetric(
            "the name must be a non-empty ASCII string".to_string(),
        ));
    }
    if !name.is_ascii() || name.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(PushError::InvalidMetric(format!(
            "the name `{}` must be ASCII without whitespace",
            name
        )));
    }
    Ok(())
}
