//! GraphQL HTTP transport for the subgraph.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::SubgraphError;
use crate::operation::{GraphqlOperation, GraphqlQuery, GraphqlRequest, GraphqlResponse};

/// Transport metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct SubgraphClientMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
}

impl SubgraphClientMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> SubgraphClientMetricsSnapshot {
        SubgraphClientMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct SubgraphClientMetricsSnapshot {
    /// Total requests.
    pub requests_total: u64,
    /// Successful requests.
    pub requests_success: u64,
    /// Failed requests.
    pub requests_error: u64,
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct SubgraphClientConfig {
    /// Service name used in log context.
    pub service_name: String,
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SubgraphClientConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            service_name: "subgraph".to_string(),
            headers,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Transport client builder.
#[derive(Debug, Clone)]
pub struct SubgraphClientBuilder {
    endpoint: String,
    config: SubgraphClientConfig,
}

impl SubgraphClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: SubgraphClientConfig::default(),
        }
    }

    /// Set the service name used in log context.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.config.service_name = service_name.into();
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Add a bearer token header.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        if let Ok(header) = HeaderValue::from_str(&value) {
            self.config
                .headers
                .insert(reqwest::header::AUTHORIZATION, header);
        }
        self
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SubgraphClient, SubgraphError> {
        SubgraphClient::with_config(self.endpoint, self.config)
    }
}

/// GraphQL transport client.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    endpoint: String,
    http: reqwest::Client,
    config: SubgraphClientConfig,
    metrics: Arc<SubgraphClientMetrics>,
}

impl SubgraphClient {
    /// Create a new client with default configuration.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self::with_config(endpoint.clone(), SubgraphClientConfig::default()).unwrap_or_else(|_| {
            Self::new_with_client(
                endpoint,
                reqwest::Client::new(),
                SubgraphClientConfig::default(),
            )
        })
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        endpoint: impl Into<String>,
        config: SubgraphClientConfig,
    ) -> Result<Self, SubgraphError> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self::new_with_client(endpoint, http, config))
    }

    fn new_with_client(
        endpoint: impl Into<String>,
        http: reqwest::Client,
        config: SubgraphClientConfig,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
            config,
            metrics: Arc::new(SubgraphClientMetrics::default()),
        }
    }

    /// Return client metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> SubgraphClientMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Execute a typed operation and return the full response.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> Result<GraphqlResponse<O::ResponseData>, SubgraphError> {
        let request = GraphqlRequest::new(GraphqlQuery::from_static(O::QUERY), variables)
            .with_operation_name(O::OPERATION_NAME);
        self.execute_request(request).await
    }

    /// Execute a typed operation and return data only (error on GraphQL errors).
    pub async fn execute_strict<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> Result<O::ResponseData, SubgraphError> {
        let response = self.execute::<O>(variables).await?;
        if !response.errors.is_empty() {
            return Err(SubgraphError::GraphqlErrors {
                errors: response.errors,
            });
        }
        response.data.ok_or_else(|| SubgraphError::Protocol {
            message: "missing GraphQL data".to_string(),
        })
    }

    /// Execute an arbitrary request.
    pub async fn execute_request<V, R>(
        &self,
        request: GraphqlRequest<V>,
    ) -> Result<GraphqlResponse<R>, SubgraphError>
    where
        V: Serialize,
        R: DeserializeOwned + Serialize,
    {
        let mut body_map = serde_json::Map::new();
        body_map.insert(
            "query".to_string(),
            serde_json::Value::String(request.query.as_str().to_string()),
        );
        body_map.insert(
            "variables".to_string(),
            serde_json::to_value(&request.variables)?,
        );
        if let Some(operation_name) = request.operation_name {
            debug!(
                service = %self.config.service_name,
                operation = %operation_name,
                "executing GraphQL operation"
            );
            body_map.insert(
                "operationName".to_string(),
                serde_json::Value::String(operation_name),
            );
        }
        let body = serde_json::Value::Object(body_map);

        let bytes = self.send_once(&serde_json::to_vec(&body)?).await?;
        let response: GraphqlResponse<R> = serde_json::from_slice(&bytes)?;

        if response.errors.is_empty() {
            self.metrics
                .requests_success
                .fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        Ok(response)
    }

    async fn send_once(&self, body_bytes: &[u8]) -> Result<Vec<u8>, SubgraphError> {
        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);

        let response = self
            .http
            .post(&self.endpoint)
            .body(body_bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = truncate_body(&bytes);
            self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
            return Err(SubgraphError::HttpStatus { status, body });
        }

        Ok(bytes.to_vec())
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        body.truncate(MAX_LEN);
        body.push('…');
    }
    body
}
