//! Blocking client for the portal REST API
//!
//! Three read-only calls, each with its own timeout. A failed call is never
//! retried; the run aborts with the mapped error.

#![allow(clippy::result_large_err)]

use crate::errors::{decode_error, http_error, invalid_token_file, invalid_url, transport_error};
use crate::errors::Result;
use cbiosync_core::errors::{io_error, ExError, ExErrorKind};
use cbiosync_core::source::{ClinicalAttributeMeta, ClinicalDatum, ClinicalEvent, ClinicalSource};
use cbiosync_core::{log_op_end, log_op_error, log_op_start};
use cbiosync_core_types::{ApiToken, Domain};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::{Duration, Instant};

/// Portal the production studies live on
pub const DEFAULT_PORTAL_URL: &str = "https://pedcbioportal.kidsfirstdrc.org/api/v2/api-docs";

const ATTRIBUTES_TIMEOUT: Duration = Duration::from_secs(30);
const CLINICAL_DATA_TIMEOUT: Duration = Duration::from_secs(60);
const CLINICAL_EVENTS_TIMEOUT: Duration = Duration::from_secs(360);

/// Reduce any portal URL to `scheme://host[:port]`
///
/// Users usually paste the API docs link; only the origin is kept.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).map_err(|e| invalid_url(raw, &e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_url(raw, "portal URL must be http or https"));
    }
    let host = url
        .host_str()
        .ok_or_else(|| invalid_url(raw, "portal URL has no host"))?;
    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Read a downloaded `token: <value>` file
pub fn load_token(path: &Path) -> Result<ApiToken> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_error("load_token", path, e))?;
    ApiToken::from_token_file(&contents)
        .ok_or_else(|| invalid_token_file(&path.display().to_string()))
}

/// Authenticated read-only portal client
pub struct PortalClient {
    http: Client,
    base_url: String,
    /// Marked sensitive, so it prints as `Sensitive` in debug output
    authorization: HeaderValue,
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("base_url", &self.base_url)
            .field("authorization", &self.authorization)
            .finish()
    }
}

impl PortalClient {
    /// Build a client for `url` (any URL on the portal host)
    pub fn new(url: &str, token: ApiToken) -> Result<Self> {
        let base_url = normalize_base_url(url)?;
        let mut authorization = HeaderValue::from_str(&token.bearer_header()).map_err(|_| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_token")
                .with_message("token contains characters not allowed in an HTTP header")
        })?;
        authorization.set_sensitive(true);
        let http = Client::builder().build().map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("build_http_client")
                .with_message(e.to_string())
        })?;
        Ok(Self {
            http,
            base_url,
            authorization,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| invalid_url(&self.base_url, &e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_url(&self.base_url, "portal URL cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send, check status, decode; wrapped in operation boundary logs
    fn fetch<T: DeserializeOwned>(
        &self,
        op: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Vec<T>> {
        log_op_start!(op, url = url);
        let start = Instant::now();

        match self.send(op, url, request) {
            Ok(items) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    count = items.len()
                );
                Ok(items)
            }
            Err(e) => {
                log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
                Err(e)
            }
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        op: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Vec<T>> {
        let response = request
            .header(AUTHORIZATION, self.authorization.clone())
            .send()
            .map_err(|e| transport_error(op, url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_error(op, url, status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| transport_error(op, url, &e))?;
        serde_json::from_str(&body).map_err(|e| decode_error(op, url, &e))
    }
}

impl ClinicalSource for PortalClient {
    fn clinical_attributes(&self, study: &str) -> Result<Vec<ClinicalAttributeMeta>> {
        let url = self.endpoint(&["api", "clinical-attributes", "fetch"])?;
        let request = self
            .http
            .post(url.clone())
            .query(&[("projection", "ID")])
            .json(&[study])
            .timeout(ATTRIBUTES_TIMEOUT);
        self.fetch("fetch_clinical_attributes", url.as_str(), request)
    }

    fn clinical_data(&self, study: &str, domain: Domain) -> Result<Vec<ClinicalDatum>> {
        let url = self.endpoint(&["api", "studies", study, "clinical-data"])?;
        let request = self
            .http
            .get(url.clone())
            .query(&[
                ("studyId", study),
                ("projection", "DETAILED"),
                ("clinicalDataType", domain.as_str()),
            ])
            .timeout(CLINICAL_DATA_TIMEOUT);
        self.fetch("fetch_clinical_data", url.as_str(), request)
    }

    fn clinical_events(&self, study: &str) -> Result<Vec<ClinicalEvent>> {
        let url = self.endpoint(&["api", "studies", study, "clinical-events"])?;
        let request = self
            .http
            .get(url.clone())
            .query(&[("projection", "DETAILED")])
            .timeout(CLINICAL_EVENTS_TIMEOUT);
        self.fetch("fetch_clinical_events", url.as_str(), request)
    }
}
