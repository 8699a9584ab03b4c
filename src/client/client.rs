use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::ClientError;
use crate::state_machine::JobRecord;
use crate::types::{ErrorResponse, HealthResponse, JobListResponse, StatsResponse, SubmitJobResponse};

/// Typed client for a running worker service.
pub struct WorkerClient {
    client: Client,
    base_url: String,
}

impl WorkerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    pub async fn submit(&self, job_type: &str) -> Result<SubmitJobResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/jobs"))
            .json(&json!({ "type": job_type }))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_status(&self, job_id: &str) -> Result<JobRecord, ClientError> {
        self.get_json(&format!("/jobs/{job_id}")).await
    }

    pub async fn list(&self) -> Result<JobListResponse, ClientError> {
        self.get_json("/jobs").await
    }

    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.get_json("/stats").await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json("/health").await
    }

    /// Poll `job_id` until it reaches a terminal status.
    ///
    /// `on_update` sees every record fetched, including the final one.
    pub async fn wait_for_terminal(
        &self,
        job_id: &str,
        poll_interval: Duration,
        mut on_update: impl FnMut(&JobRecord),
    ) -> Result<JobRecord, ClientError> {
        loop {
            let record = self.get_status(job_id).await?;
            on_update(&record);
            if record.status.is_terminal() {
                return Ok(record);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
