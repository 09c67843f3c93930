// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::AgentError;
use crate::payload::{HeartbeatPayload, RegisterPayload};

const SECRET_HEADER: &str = "x-edgemesh-secret";

/// Thin wrapper over a `reqwest::Client` bound to the coordinator's base URL
/// and (optionally) the shared-secret header required by `/v1/agent/*`.
pub struct CoordinatorClient {
    http: Client,
    base_url: String,
}

impl CoordinatorClient {
    pub fn new(base_url: String, shared_secret: Option<&str>) -> Result<Self, AgentError> {
        let mut headers = HeaderMap::new();
        if let Some(secret) = shared_secret {
            headers.insert(SECRET_HEADER, HeaderValue::from_str(secret).unwrap_or_else(|_| HeaderValue::from_static("")));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(CoordinatorClient { http, base_url })
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<(), AgentError> {
        self.post("/v1/agent/register", payload).await
    }

    pub async fn heartbeat(&self, payload: &HeartbeatPayload) -> Result<(), AgentError> {
        self.post("/v1/agent/heartbeat", payload).await
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(), AgentError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(payload)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::Rejected { status, body })
    }
}
