//! Shared data model for the lifecycle engine and the coordinator API boundary.
//!
//! Wire names follow the coordinator's JSON convention (camelCase for computed
//! payloads, the original SCREAMING_SNAKE keys for env-derived settings).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two media partitions, each owned by its own external manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Tv,
    Movie,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Tv => "tv",
            MediaType::Movie => "movie",
        }
    }

    /// Name of the external manager responsible for this type.
    pub fn manager_name(&self) -> &'static str {
        match self {
            MediaType::Tv => "sonarr",
            MediaType::Movie => "radarr",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-assigned retention rule for a library item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetentionRule {
    #[default]
    #[serde(rename = "auto-manage")]
    AutoManage,
    #[serde(rename = "keep-forever")]
    KeepForever,
    #[serde(rename = "archive-after-6months")]
    ArchiveAfter6Months,
    #[serde(rename = "delete-after-watched")]
    DeleteAfterWatched,
}

/// One item of the library catalog as delivered by the coordinator.
///
/// Refreshed wholesale on each load; only `rule` is ever edited locally, and
/// that edit travels through the settings save path, not the action path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    /// Size on disk in gigabytes.
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub last_watched: Option<NaiveDate>,
    #[serde(default)]
    pub watch_count: u32,
    /// Opaque classification computed upstream. See [`StatusFlags::parse`].
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rule: RetentionRule,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub root_folder_path: Option<String>,
    #[serde(default)]
    pub streaming_services: Vec<String>,
    #[serde(default)]
    pub sonarr_id: Option<i64>,
    #[serde(default)]
    pub radarr_id: Option<i64>,
}

impl MediaItem {
    /// The manager-specific identifier that applies to this item's type.
    pub fn manager_id(&self) -> Option<i64> {
        match self.media_type {
            MediaType::Tv => self.sonarr_id,
            MediaType::Movie => self.radarr_id,
        }
    }

    pub fn status_flags(&self) -> StatusFlags {
        StatusFlags::parse(&self.status)
    }
}

/// The upstream `status` string parsed into an explicit set of flags.
///
/// The tokens are substring markers, not a closed enum; both may co-occur.
/// A status that matches neither is simply not actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    pub candidate_delete: bool,
    pub candidate_archive: bool,
}

impl StatusFlags {
    pub fn parse(status: &str) -> Self {
        Self {
            candidate_delete: status.contains("candidate-delete"),
            candidate_archive: status.contains("candidate-archive"),
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.candidate_delete || self.candidate_archive
    }
}

/// A source → destination folder mapping for one media partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMapping {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// A root storage path known to a manager as a valid content location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderChoice {
    pub path: String,
}

/// Capacity figures for one pool, in gigabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageInfo {
    pub total: f64,
    pub used: f64,
    pub available: f64,
}

/// Library composition counts for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryStats {
    pub tv: u32,
    pub tv_size: f64,
    pub tv_episodes: u32,
    pub movies: u32,
    pub movies_size: f64,
    #[serde(rename = "onStreaming")]
    pub on_streaming: u32,
}

/// Highlight lists the coordinator pre-computes for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendedActions {
    pub ended_shows: Vec<MediaItem>,
    pub streaming_movies: Vec<MediaItem>,
}

/// The aggregate payload of the dashboard view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    pub storage_data: StorageInfo,
    pub archive_data: StorageInfo,
    pub potential_savings: f64,
    pub candidates: Vec<MediaItem>,
    pub library_stats: LibraryStats,
    pub recommended_actions: RecommendedActions,
}

/// Per-service connection status, e.g. `"Connected"` / `"Not Configured"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStatus {
    pub plex: String,
    pub sonarr: String,
    pub radarr: String,
}

/// Root folder catalogs for both managers, fetched together for the
/// settings view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFolderCatalogs {
    pub sonarr: Vec<FolderChoice>,
    pub radarr: Vec<FolderChoice>,
}

impl RootFolderCatalogs {
    pub fn for_type(&self, media_type: MediaType) -> &[FolderChoice] {
        match media_type {
            MediaType::Tv => &self.sonarr,
            MediaType::Movie => &self.radarr,
        }
    }
}

/// Full configuration object as stored by the coordinator's settings store.
///
/// Behavioral settings use camelCase; connection fields keep the coordinator's
/// env-derived key names verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_delete_after_days: u32,
    pub archive_after_months: u32,
    pub keep_free_space: u32,
    pub enable_auto_actions: bool,
    pub check_streaming_availability: bool,
    pub preferred_streaming_services: Vec<String>,
    pub archive_mappings: Vec<ArchiveMapping>,
    #[serde(rename = "AVAILABLE_STREAMING_PROVIDERS")]
    pub available_streaming_providers: Vec<String>,
    #[serde(rename = "SONARR_URL")]
    pub sonarr_url: String,
    #[serde(rename = "SONARR_API_KEY")]
    pub sonarr_api_key: String,
    #[serde(rename = "RADARR_URL")]
    pub radarr_url: String,
    #[serde(rename = "RADARR_API_KEY")]
    pub radarr_api_key: String,
    #[serde(rename = "PLEX_URL")]
    pub plex_url: String,
    #[serde(rename = "PLEX_TOKEN")]
    pub plex_token: String,
    #[serde(rename = "TV_ARCHIVE_FOLDERS")]
    pub tv_archive_folders: Vec<String>,
    #[serde(rename = "MOVIE_ARCHIVE_FOLDERS")]
    pub movie_archive_folders: Vec<String>,
    #[serde(rename = "MOUNT_POINTS")]
    pub mount_points: Vec<String>,
    #[serde(rename = "DATA_UPDATE_INTERVAL")]
    pub data_update_interval: u32,
    /// Configuration keys this client does not model. The save path
    /// overwrites the whole stored object, so these must survive the
    /// load, edit, save round trip untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_delete_after_days: 30,
            archive_after_months: 6,
            keep_free_space: 500,
            enable_auto_actions: false,
            check_streaming_availability: true,
            preferred_streaming_services: Vec::new(),
            archive_mappings: Vec::new(),
            available_streaming_providers: Vec::new(),
            sonarr_url: String::new(),
            sonarr_api_key: String::new(),
            radarr_url: String::new(),
            radarr_api_key: String::new(),
            plex_url: String::new(),
            plex_token: String::new(),
            tv_archive_folders: Vec::new(),
            movie_archive_folders: Vec::new(),
            mount_points: Vec::new(),
            data_update_interval: 30,
            extra: serde_json::Map::new(),
        }
    }
}

/// The action kinds the dispatcher can send to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Archive,
    Delete,
}

impl std::fmt::Display for ItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemAction::Archive => f.write_str("archive"),
            ItemAction::Delete => f.write_str("delete"),
        }
    }
}

/// Minimal projection of a [`MediaItem`] carried in an action payload.
///
/// Absent fields are omitted from the wire entirely; in particular a missing
/// manager id must never be sent as a null placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProjection {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sonarr_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub radarr_id: Option<i64>,
}

impl ItemProjection {
    /// Projects an item, keeping only the manager id that applies to its type.
    pub fn from_item(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            media_type: item.media_type,
            file_path: item.file_path.clone(),
            sonarr_id: match item.media_type {
                MediaType::Tv => item.sonarr_id,
                MediaType::Movie => None,
            },
            radarr_id: match item.media_type {
                MediaType::Movie => item.radarr_id,
                MediaType::Tv => None,
            },
        }
    }
}

/// Payload for the coordinator's item action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: ItemAction,
    pub item: ItemProjection,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub archive_path: Option<String>,
}

/// Acknowledgement returned by action and trigger endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionOutcome {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(media_type: MediaType) -> MediaItem {
        MediaItem {
            id: "42".into(),
            media_type,
            title: "Example".into(),
            size: 12.5,
            last_watched: None,
            watch_count: 0,
            status: String::new(),
            rule: RetentionRule::AutoManage,
            file_path: Some("/media/example/file.mkv".into()),
            root_folder_path: None,
            streaming_services: Vec::new(),
            sonarr_id: Some(7),
            radarr_id: Some(9),
        }
    }

    #[test]
    fn status_flags_parse_substring_markers() {
        let flags = StatusFlags::parse("ended candidate-archive");
        assert!(flags.candidate_archive);
        assert!(!flags.candidate_delete);

        let both = StatusFlags::parse("candidate-delete candidate-archive");
        assert!(both.candidate_delete && both.candidate_archive);

        // Anything else is a no-action state, not an error.
        assert!(!StatusFlags::parse("ended").is_candidate());
        assert!(!StatusFlags::parse("").is_candidate());
    }

    #[test]
    fn projection_keeps_only_the_applicable_manager_id() {
        let tv = ItemProjection::from_item(&item(MediaType::Tv));
        assert_eq!(tv.sonarr_id, Some(7));
        assert_eq!(tv.radarr_id, None);

        let movie = ItemProjection::from_item(&item(MediaType::Movie));
        assert_eq!(movie.sonarr_id, None);
        assert_eq!(movie.radarr_id, Some(9));
    }

    #[test]
    fn projection_omits_absent_fields_from_the_wire() {
        let mut source = item(MediaType::Tv);
        source.sonarr_id = None;
        source.file_path = None;

        let request = ActionRequest {
            action: ItemAction::Delete,
            item: ItemProjection::from_item(&source),
            archive_path: None,
        };
        let wire = serde_json::to_value(&request).unwrap();
        let item_obj = wire.get("item").unwrap().as_object().unwrap();
        assert!(!item_obj.contains_key("sonarrId"));
        assert!(!item_obj.contains_key("radarrId"));
        assert!(!item_obj.contains_key("filePath"));
        assert!(wire.get("archivePath").is_none());
        assert_eq!(wire.get("action").unwrap(), "delete");
    }

    #[test]
    fn unmodeled_settings_keys_survive_the_save_round_trip() {
        // The coordinator stores keys this client never edits; the save
        // path replaces the whole object, so they must be carried through.
        let raw = serde_json::json!({
            "autoDeleteAfterDays": 45,
            "TMDB_API_KEY": "abc123",
            "STREAMING_PROVIDERS": "netflix,disney",
            "ARCHIVE_DRIVE": "/mnt/archive"
        });
        let settings: Settings = serde_json::from_value(raw).unwrap();
        assert_eq!(settings.auto_delete_after_days, 45);

        let wire = serde_json::to_value(&settings).unwrap();
        assert_eq!(wire.get("TMDB_API_KEY").unwrap(), "abc123");
        assert_eq!(wire.get("STREAMING_PROVIDERS").unwrap(), "netflix,disney");
        assert_eq!(wire.get("ARCHIVE_DRIVE").unwrap(), "/mnt/archive");
    }

    #[test]
    fn media_item_deserializes_from_coordinator_wire_form() {
        let raw = serde_json::json!({
            "id": "abc",
            "type": "movie",
            "title": "Big Film",
            "size": 48.2,
            "watchCount": 2,
            "status": "candidate-delete",
            "rule": "delete-after-watched",
            "streamingServices": ["netflix"],
            "radarrId": 311
        });
        let item: MediaItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.media_type, MediaType::Movie);
        assert_eq!(item.rule, RetentionRule::DeleteAfterWatched);
        assert_eq!(item.manager_id(), Some(311));
        assert!(item.status_flags().candidate_delete);
    }
}
