//! HTTP client for the JSON compute service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ComputeClient, HistoryEntry, HistoryError, Operation, ServiceError};

/// Fallback message when the service does not explain a failed calculation.
const CALCULATION_FAILED: &str = "Calculation failed";

#[derive(Debug, Serialize)]
struct CalculationRequest {
    operation: Operation,
    num1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    num2: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CalculationResponse {
    result: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the compute service's REST API.
pub struct HttpComputeClient {
    client: Client,
    base_url: String,
}

impl HttpComputeClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the service for its health status.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to reach compute service")?
            .error_for_status()
            .context("Health check failed")?;

        let health: HealthResponse = response
            .json()
            .await
            .context("Failed to parse health response")?;
        Ok(health.status)
    }

    async fn rejection(response: Response) -> ServiceError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: ErrorResponse = serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(%status, error = %e, body = %text, "unreadable error response");
            ErrorResponse::default()
        });
        debug!(%status, error = ?body.error, "calculation rejected");
        ServiceError::Rejected(body.error.unwrap_or_else(|| CALCULATION_FAILED.to_string()))
    }
}

#[async_trait]
impl ComputeClient for HttpComputeClient {
    async fn compute(
        &self,
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    ) -> Result<f64, ServiceError> {
        debug!(%operation, num1, ?num2, "sending calculation");

        let request = CalculationRequest {
            operation,
            num1,
            num2,
        };
        let response = self
            .client
            .post(self.url("/calculate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: CalculationResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Protocol(e.to_string()))?;
        Ok(body.result)
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let response = self
            .client
            .get(self.url("/history"))
            .send()
            .await
            .map_err(|e| HistoryError::Load(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "history request failed");
            return Err(HistoryError::Load(format!("HTTP {}", response.status())));
        }

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| HistoryError::Load(e.to_string()))?;
        Ok(body.history)
    }

    async fn clear_history(&self) -> Result<(), HistoryError> {
        let response = self
            .client
            .delete(self.url("/history"))
            .send()
            .await
            .map_err(|e| HistoryError::Clear(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HistoryError::Clear(format!("HTTP {}", response.status())));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
