//! HTTP implementation of the coordinator boundary.
//!
//! Talks JSON to the coordinator's REST surface (`/api/...`). Timeouts are
//! left to the transport's defaults; staleness is handled by the caller.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::{ApiError, ApiResult, CoordinatorApi};
use crate::models::{
    ActionOutcome, ActionRequest, ConnectionStatus, DashboardData, FolderChoice, MediaItem,
    MediaType, RootFolderCatalogs, Settings,
};

/// Reqwest-backed coordinator client.
pub struct HttpCoordinator {
    client: Client,
    base_url: String,
}

/// Error/ack body shape shared by most coordinator endpoints.
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FolderListBody {
    #[serde(default)]
    folders: Vec<FolderChoice>,
}

impl HttpCoordinator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Converts a non-success response into [`ApiError::Remote`], surfacing
    /// the server-provided message when the body carries one.
    async fn check(response: Response, what: &str) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("{what} failed with status {status}"));
        Err(ApiError::Remote(message))
    }

    /// Reads the `message` ack out of a trigger response.
    async fn ack_message(response: Response, fallback: &str) -> ApiResult<String> {
        Ok(response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback.to_string()))
    }
}

#[async_trait]
impl CoordinatorApi for HttpCoordinator {
    async fn dashboard(&self) -> ApiResult<DashboardData> {
        debug!("Fetching dashboard aggregates");
        let response = self.client.get(self.url("/api/dashboard")).send().await?;

        // The coordinator answers 202 with a message-only body while the
        // initial sync is still gathering data. That is a load failure for
        // this view, not an empty dashboard.
        if response.status() == StatusCode::ACCEPTED {
            let message = Self::ack_message(response, "Dashboard data is not ready yet").await?;
            return Err(ApiError::Remote(message));
        }

        let response = Self::check(response, "Dashboard load").await?;
        Ok(response.json().await?)
    }

    async fn content(&self) -> ApiResult<Vec<MediaItem>> {
        debug!("Fetching full content catalog");
        let response = self.client.get(self.url("/api/content")).send().await?;
        let response = Self::check(response, "Content load").await?;
        let items: Vec<MediaItem> = response.json().await?;
        debug!(count = items.len(), "Content catalog loaded");
        Ok(items)
    }

    async fn settings(&self) -> ApiResult<Settings> {
        debug!("Fetching settings");
        let response = self.client.get(self.url("/api/settings")).send().await?;
        let response = Self::check(response, "Settings load").await?;
        Ok(response.json().await?)
    }

    async fn connection_status(&self) -> ApiResult<ConnectionStatus> {
        debug!("Fetching connection status");
        let response = self.client.get(self.url("/api/status")).send().await?;
        let response = Self::check(response, "Status load").await?;
        Ok(response.json().await?)
    }

    async fn root_folders(&self, media_type: MediaType) -> ApiResult<Vec<FolderChoice>> {
        debug!(manager = media_type.manager_name(), "Fetching root folders");
        let response = self
            .client
            .get(self.url("/api/root-folders"))
            .query(&[("type", media_type.manager_name())])
            .send()
            .await?;
        let response = Self::check(response, "Root folder load").await?;
        let body: FolderListBody = response.json().await?;
        Ok(body.folders)
    }

    async fn all_root_folders(&self) -> ApiResult<RootFolderCatalogs> {
        debug!("Fetching root folder catalogs for both managers");
        let response = self
            .client
            .get(self.url("/api/root-folders/all"))
            .send()
            .await?;
        let response = Self::check(response, "Root folder load").await?;
        Ok(response.json().await?)
    }

    async fn save_settings(&self, settings: &Settings) -> ApiResult<()> {
        info!("Saving settings");
        let response = self
            .client
            .post(self.url("/api/settings"))
            .json(settings)
            .send()
            .await?;
        Self::check(response, "Settings save").await?;
        Ok(())
    }

    async fn execute_action(
        &self,
        media_id: &str,
        request: &ActionRequest,
    ) -> ApiResult<ActionOutcome> {
        info!(
            action = %request.action,
            title = %request.item.title,
            "Dispatching item action"
        );
        let response = self
            .client
            .post(self.url(&format!("/api/content/{media_id}/action")))
            .json(request)
            .send()
            .await?;
        let response = Self::check(response, "Action dispatch").await?;
        Ok(response.json().await?)
    }

    async fn trigger_sync(&self) -> ApiResult<String> {
        info!("Triggering background sync");
        let response = self.client.post(self.url("/api/sync/trigger")).send().await?;
        let response = Self::check(response, "Sync trigger").await?;
        Self::ack_message(response, "Sync started in the background").await
    }

    async fn trigger_cleanup(&self) -> ApiResult<String> {
        info!("Triggering cleanup pass");
        let response = self
            .client
            .post(self.url("/api/cleanup/trigger"))
            .json(&serde_json::json!({ "dryRun": false }))
            .send()
            .await?;
        let response = Self::check(response, "Cleanup trigger").await?;
        Self::ack_message(response, "Cleanup started in the background").await
    }
}
