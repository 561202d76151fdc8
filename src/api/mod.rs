//! Coordinator API boundary.
//!
//! The engine only ever talks to the coordinator through [`CoordinatorApi`],
//! so every state machine in [`crate::engine`] can be driven by a mock in
//! tests. [`http::HttpCoordinator`] is the production implementation.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpCoordinator;

use crate::models::{
    ActionOutcome, ActionRequest, ConnectionStatus, DashboardData, FolderChoice, MediaItem,
    MediaType, RootFolderCatalogs, Settings,
};

/// A failed boundary operation. The server-provided message is surfaced
/// verbatim when present; transport failures fall back to a generic text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Remote(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The boundary operations this engine consumes, all JSON request/response.
///
/// No operation retries automatically; retrying is always an explicit,
/// operator-triggered repeat of the whole protocol.
#[async_trait]
pub trait CoordinatorApi: Send + Sync {
    /// Pre-computed dashboard aggregates.
    async fn dashboard(&self) -> ApiResult<DashboardData>;

    /// The full item catalog, unfiltered. Filtering, sorting and pagination
    /// are client-side projections over this set.
    async fn content(&self) -> ApiResult<Vec<MediaItem>>;

    /// Current configuration from the settings store.
    async fn settings(&self) -> ApiResult<Settings>;

    /// Per-service connection status.
    async fn connection_status(&self) -> ApiResult<ConnectionStatus>;

    /// Valid root storage locations known to one manager, for the archive
    /// destination dialog.
    async fn root_folders(&self, media_type: MediaType) -> ApiResult<Vec<FolderChoice>>;

    /// Root folder catalogs of both managers in one call, for the settings
    /// view's initial load.
    async fn all_root_folders(&self) -> ApiResult<RootFolderCatalogs>;

    /// Persist the full configuration object.
    async fn save_settings(&self, settings: &Settings) -> ApiResult<()>;

    /// Execute an archive or delete against the managers and the media-server
    /// index. The physical move/delete happens remotely.
    async fn execute_action(
        &self,
        media_id: &str,
        request: &ActionRequest,
    ) -> ApiResult<ActionOutcome>;

    /// Start a full background sync. Start/ack semantics only.
    async fn trigger_sync(&self) -> ApiResult<String>;

    /// Start a cleanup pass. Start/ack semantics only.
    async fn trigger_cleanup(&self) -> ApiResult<String>;
}
