// src/client.rs
//! HTTP surface of the tracker backend: three polled reads and the
//! start-fetch command. Views only see the `Backend` trait, so tests can swap
//! in fakes without a socket.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Endpoints;
use crate::error::{FetchError, SubmitError, DEFAULT_REJECTION};
use crate::model::{
    Alert, DashboardStats, ErrorBody, Listing, Mention, StartFetchRequest, StartFetchResponse,
};

#[async_trait]
pub trait Backend: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats, FetchError>;
    async fn recent_mentions(&self) -> Result<Vec<Mention>, FetchError>;
    /// Newest first.
    async fn alerts(&self) -> Result<Vec<Alert>, FetchError>;
    /// Register an RSS feed; returns the URL the backend echoes back.
    async fn start_fetch(&self, url: &str) -> Result<String, SubmitError>;
}

#[derive(Clone)]
pub struct ApiClient {
    endpoints: Endpoints,
    client: Client,
    mentions_limit: usize,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            client: Client::new(),
            mentions_limit: 100,
        }
    }

    pub fn with_mentions_limit(mut self, limit: usize) -> Self {
        self.mentions_limit = limit.max(1);
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let rsp = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(target: "client", %url, error = %e, "request failed");
            FetchError::Transport(e.to_string())
        })?;

        let status = rsp.status();
        if !status.is_success() {
            tracing::warn!(target: "client", %url, status = status.as_u16(), "non-success response");
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = rsp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(target: "client", %url, error = %e, "undecodable body");
            FetchError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats, FetchError> {
        self.get_json(&self.endpoints.dashboard_stats()).await
    }

    async fn recent_mentions(&self) -> Result<Vec<Mention>, FetchError> {
        let listing: Listing<Mention> = self
            .get_json(&self.endpoints.recent_mentions(self.mentions_limit))
            .await?;
        Ok(listing.into_vec())
    }

    async fn alerts(&self) -> Result<Vec<Alert>, FetchError> {
        let listing: Listing<Alert> = self.get_json(&self.endpoints.alerts()).await?;
        Ok(listing.into_vec())
    }

    async fn start_fetch(&self, url: &str) -> Result<String, SubmitError> {
        let endpoint = self.endpoints.start_fetch();
        let rsp = self
            .client
            .post(&endpoint)
            .json(&StartFetchRequest {
                url: url.to_string(),
            })
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = rsp.status();
        let bytes = rsp
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if status.is_success() {
            let body: StartFetchResponse = serde_json::from_slice(&bytes)
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            tracing::info!(
                target: "client",
                %url,
                status = body.status.as_deref().unwrap_or("-"),
                "feed fetch started"
            );
            Ok(body.url.unwrap_or_else(|| url.to_string()))
        } else {
            let body: ErrorBody = serde_json::from_slice(&bytes)
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            let text = body
                .error
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            tracing::warn!(target: "client", %url, status = status.as_u16(), error = %text, "feed rejected");
            Err(SubmitError::Rejected(text))
        }
    }
}
