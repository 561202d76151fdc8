//! Folder catalog resolution against the external managers.

use tracing::debug;

use crate::api::CoordinatorApi;
use crate::error::EngineError;
use crate::models::{FolderChoice, MediaType};

/// Lists the valid root storage locations known to the manager responsible
/// for `media_type`.
///
/// A failure is surfaced as [`EngineError::UpstreamUnavailable`] and must not
/// be replaced with an empty list: an empty catalog is a valid, distinct
/// configuration state.
pub async fn list_folders(
    api: &dyn CoordinatorApi,
    media_type: MediaType,
) -> Result<Vec<FolderChoice>, EngineError> {
    let folders = api
        .root_folders(media_type)
        .await
        .map_err(|e| EngineError::UpstreamUnavailable(e.message()))?;
    debug!(
        manager = media_type.manager_name(),
        count = folders.len(),
        "Resolved root folder catalog"
    );
    Ok(folders)
}
