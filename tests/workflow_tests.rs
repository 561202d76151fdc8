//! Integration tests for the action workflow and view synchronization
//!
//! These tests drive the engine end to end against a scripted coordinator:
//! - Confirmation guards (no dispatch before an explicit confirm)
//! - Archive folder resolution and selection
//! - Dispatch failure recovery
//! - Stale-response suppression across view switches
//! - Atomic settings loading and commit

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;

use shelflife::api::{ApiError, ApiResult, CoordinatorApi};
use shelflife::engine::{
    ActionDispatcher, Commit, DispatchState, SettingsSession, TabSynchronizer, ViewId, fetch_view,
};
use shelflife::error::EngineError;
use shelflife::models::{
    ActionOutcome, ActionRequest, ConnectionStatus, DashboardData, FolderChoice, ItemAction,
    MediaItem, MediaType, RetentionRule, RootFolderCatalogs, Settings,
};

// ============================================================================
// Scripted coordinator
// ============================================================================

/// A coordinator whose responses are scripted per call site, with counters so
/// tests can assert that an operation was never reached.
#[derive(Default)]
struct ScriptedCoordinator {
    fail_actions: bool,
    fail_settings: bool,
    fail_status: bool,
    fail_save: bool,
    tv_folders: Vec<FolderChoice>,
    movie_folders: Vec<FolderChoice>,
    content: Vec<MediaItem>,
    action_calls: AtomicUsize,
    save_calls: AtomicUsize,
    last_action: Mutex<Option<(String, ActionRequest)>>,
    last_saved: Mutex<Option<Settings>>,
}

impl ScriptedCoordinator {
    fn action_calls(&self) -> usize {
        self.action_calls.load(Ordering::SeqCst)
    }

    fn last_action(&self) -> Option<(String, ActionRequest)> {
        self.last_action.lock().unwrap().clone()
    }
}

fn remote(message: &str) -> ApiError {
    ApiError::Remote(message.to_string())
}

#[async_trait]
impl CoordinatorApi for ScriptedCoordinator {
    async fn dashboard(&self) -> ApiResult<DashboardData> {
        Ok(DashboardData::default())
    }

    async fn content(&self) -> ApiResult<Vec<MediaItem>> {
        Ok(self.content.clone())
    }

    async fn settings(&self) -> ApiResult<Settings> {
        if self.fail_settings {
            return Err(remote("settings store unavailable"));
        }
        Ok(Settings::default())
    }

    async fn connection_status(&self) -> ApiResult<ConnectionStatus> {
        if self.fail_status {
            return Err(remote("status probe failed"));
        }
        Ok(ConnectionStatus {
            plex: "Connected".into(),
            sonarr: "Connected".into(),
            radarr: "Not Configured".into(),
        })
    }

    async fn root_folders(&self, media_type: MediaType) -> ApiResult<Vec<FolderChoice>> {
        Ok(match media_type {
            MediaType::Tv => self.tv_folders.clone(),
            MediaType::Movie => self.movie_folders.clone(),
        })
    }

    async fn all_root_folders(&self) -> ApiResult<RootFolderCatalogs> {
        Ok(RootFolderCatalogs {
            sonarr: self.tv_folders.clone(),
            radarr: self.movie_folders.clone(),
        })
    }

    async fn save_settings(&self, settings: &Settings) -> ApiResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(remote("disk full"));
        }
        *self.last_saved.lock().unwrap() = Some(settings.clone());
        Ok(())
    }

    async fn execute_action(
        &self,
        media_id: &str,
        request: &ActionRequest,
    ) -> ApiResult<ActionOutcome> {
        self.action_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_actions {
            return Err(remote("Failed to move folder"));
        }
        *self.last_action.lock().unwrap() = Some((media_id.to_string(), request.clone()));
        Ok(ActionOutcome {
            status: "success".into(),
            message: format!("{} dispatched", request.action),
        })
    }

    async fn trigger_sync(&self) -> ApiResult<String> {
        Ok("Sync started".into())
    }

    async fn trigger_cleanup(&self) -> ApiResult<String> {
        Ok("Cleanup started".into())
    }
}

fn item(id: &str, media_type: MediaType) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        media_type,
        title: format!("Title {id}"),
        size: 10.0,
        last_watched: None,
        watch_count: 1,
        status: "candidate-archive".into(),
        rule: RetentionRule::AutoManage,
        file_path: Some(format!("/media/{id}")),
        root_folder_path: None,
        streaming_services: Vec::new(),
        sonarr_id: Some(1),
        radarr_id: Some(2),
    }
}

fn folders(paths: &[&str]) -> Vec<FolderChoice> {
    paths
        .iter()
        .map(|p| FolderChoice {
            path: p.to_string(),
        })
        .collect()
}

// ============================================================================
// Action dispatch
// ============================================================================

#[tokio::test]
async fn declined_delete_never_reaches_the_coordinator() {
    let api = ScriptedCoordinator::default();
    let mut dispatcher = ActionDispatcher::new();

    dispatcher.request_delete(item("1", MediaType::Movie)).unwrap();
    assert_matches!(dispatcher.state(), DispatchState::AwaitingConfirmation { .. });

    dispatcher.cancel();
    assert!(dispatcher.is_idle());
    assert_eq!(api.action_calls(), 0);
}

#[tokio::test]
async fn confirmed_delete_dispatches_and_returns_to_idle() {
    let api = ScriptedCoordinator::default();
    let mut dispatcher = ActionDispatcher::new();

    dispatcher.request_delete(item("9", MediaType::Tv)).unwrap();
    let outcome = dispatcher.confirm(&api).await.unwrap();

    assert_eq!(outcome.status, "success");
    assert!(dispatcher.is_idle());
    let (id, request) = api.last_action().unwrap();
    assert_eq!(id, "9");
    assert_eq!(request.action, ItemAction::Delete);
    assert_eq!(request.archive_path, None);
    // Delete payloads carry the applicable manager id only.
    assert_eq!(request.item.sonarr_id, Some(1));
    assert_eq!(request.item.radarr_id, None);
}

#[tokio::test]
async fn archive_resolves_folders_for_the_item_type_and_defaults_to_first() {
    let api = ScriptedCoordinator {
        tv_folders: folders(&["/cold/tv", "/cold2/tv"]),
        movie_folders: folders(&["/cold/movies"]),
        ..Default::default()
    };
    let mut dispatcher = ActionDispatcher::new();

    dispatcher
        .request_archive(&api, item("5", MediaType::Tv))
        .await
        .unwrap();
    let DispatchState::AwaitingFolderSelection { pending } = dispatcher.state() else {
        panic!("expected folder selection state");
    };
    assert_eq!(pending.folders, folders(&["/cold/tv", "/cold2/tv"]));
    assert_eq!(pending.selected, Some(0));

    dispatcher.select_folder(1).unwrap();
    let outcome = dispatcher.confirm(&api).await.unwrap();
    assert_eq!(outcome.status, "success");
    assert!(dispatcher.is_idle());

    let (_, request) = api.last_action().unwrap();
    assert_eq!(request.action, ItemAction::Archive);
    assert_eq!(request.archive_path.as_deref(), Some("/cold2/tv"));
}

#[tokio::test]
async fn archive_with_empty_catalog_cannot_be_confirmed() {
    let api = ScriptedCoordinator::default();
    let mut dispatcher = ActionDispatcher::new();

    dispatcher
        .request_archive(&api, item("5", MediaType::Movie))
        .await
        .unwrap();
    let DispatchState::AwaitingFolderSelection { pending } = dispatcher.state() else {
        panic!("expected folder selection state");
    };
    assert_eq!(pending.selected, None);

    let err = dispatcher.confirm(&api).await.unwrap_err();
    assert_matches!(err, EngineError::ValidationGap(_));
    // Refused before any network call; the request stays pending.
    assert_eq!(api.action_calls(), 0);
    assert_matches!(
        dispatcher.state(),
        DispatchState::AwaitingFolderSelection { .. }
    );
}

#[tokio::test]
async fn out_of_range_folder_selection_is_rejected() {
    let api = ScriptedCoordinator {
        tv_folders: folders(&["/cold/tv"]),
        ..Default::default()
    };
    let mut dispatcher = ActionDispatcher::new();

    dispatcher
        .request_archive(&api, item("5", MediaType::Tv))
        .await
        .unwrap();
    let err = dispatcher.select_folder(3).unwrap_err();
    assert_matches!(err, EngineError::ValidationGap(_));
}

#[tokio::test]
async fn failed_archive_dispatch_keeps_the_pending_request() {
    let api = ScriptedCoordinator {
        fail_actions: true,
        tv_folders: folders(&["/cold/tv"]),
        ..Default::default()
    };
    let mut dispatcher = ActionDispatcher::new();

    dispatcher
        .request_archive(&api, item("5", MediaType::Tv))
        .await
        .unwrap();
    let err = dispatcher.confirm(&api).await.unwrap_err();

    assert_matches!(err, EngineError::ActionFailure(ref message) if message == "Failed to move folder");
    assert_matches!(
        dispatcher.state(),
        DispatchState::AwaitingFolderSelection { .. }
    );
    // The operator can still dismiss the dialog explicitly.
    dispatcher.cancel();
    assert!(dispatcher.is_idle());
}

#[tokio::test]
async fn a_second_request_is_refused_while_one_is_pending() {
    let api = ScriptedCoordinator::default();
    let mut dispatcher = ActionDispatcher::new();

    dispatcher.request_delete(item("1", MediaType::Tv)).unwrap();
    let err = dispatcher.request_delete(item("2", MediaType::Tv)).unwrap_err();
    assert_matches!(err, EngineError::ValidationGap(_));

    let err = dispatcher
        .request_archive(&api, item("2", MediaType::Tv))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::ValidationGap(_));
    assert_eq!(api.action_calls(), 0);
}

// ============================================================================
// View synchronization
// ============================================================================

#[tokio::test]
async fn stale_response_never_overwrites_the_active_view() {
    let api = ScriptedCoordinator {
        content: vec![item("1", MediaType::Tv)],
        ..Default::default()
    };
    let mut sync = TabSynchronizer::new();

    // The content load is issued, then the operator switches to settings
    // before it lands.
    let content_ticket = sync.activate(ViewId::Content);
    let content_result = fetch_view(&api, ViewId::Content).await;

    let settings_ticket = sync.activate(ViewId::Settings);
    let settings_result = fetch_view(&api, ViewId::Settings).await;
    assert_eq!(sync.commit(settings_ticket, settings_result), Commit::Applied);

    // The late content response is discarded, not applied to any view.
    assert_eq!(
        sync.commit(content_ticket, content_result),
        Commit::DiscardedStale
    );
    assert_eq!(sync.active_view(), ViewId::Settings);
    assert!(sync.settings().is_some());
    assert!(sync.content().is_none());
    assert!(!sync.is_loading());
}

#[tokio::test]
async fn settings_view_loads_atomically_or_not_at_all() {
    let api = ScriptedCoordinator {
        fail_status: true,
        tv_folders: folders(&["/cold/tv"]),
        ..Default::default()
    };
    let mut sync = TabSynchronizer::new();

    let err = sync.load(&api, ViewId::Settings).await.unwrap_err();
    assert_matches!(err, EngineError::LoadFailure { view: ViewId::Settings, .. });
    assert!(sync.settings().is_none());
    assert_eq!(sync.error(ViewId::Settings), Some("status probe failed"));
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_data_visible() {
    let mut api = ScriptedCoordinator::default();
    let mut sync = TabSynchronizer::new();

    sync.load(&api, ViewId::Settings).await.unwrap();
    assert!(sync.settings().is_some());
    assert_eq!(sync.error(ViewId::Settings), None);

    api.fail_settings = true;
    sync.load(&api, ViewId::Settings).await.unwrap_err();

    // Stale-but-visible: the old data set stays, the error is recorded.
    assert!(sync.settings().is_some());
    assert_eq!(
        sync.error(ViewId::Settings),
        Some("settings store unavailable")
    );

    // An explicit retry after the outage clears the error.
    api.fail_settings = false;
    let ticket = sync.retry();
    assert_eq!(ticket.view(), ViewId::Settings);
    let result = fetch_view(&api, ViewId::Settings).await;
    assert_eq!(sync.commit(ticket, result), Commit::Applied);
    assert_eq!(sync.error(ViewId::Settings), None);
}

#[tokio::test]
async fn successful_load_exposes_the_typed_data_set() {
    let api = ScriptedCoordinator {
        content: vec![item("1", MediaType::Tv), item("2", MediaType::Movie)],
        ..Default::default()
    };
    let mut sync = TabSynchronizer::new();

    sync.load(&api, ViewId::Content).await.unwrap();
    let items = sync.content().unwrap();
    assert_eq!(items.len(), 2);

    sync.load(&api, ViewId::Dashboard).await.unwrap();
    assert!(sync.dashboard().is_some());
    // The earlier content set is untouched by the dashboard load.
    assert_eq!(sync.content().unwrap().len(), 2);
}

// ============================================================================
// Settings session
// ============================================================================

#[tokio::test]
async fn commit_persists_the_draft_including_mapping_edits() {
    let api = ScriptedCoordinator::default();
    let mut session = SettingsSession::new(Settings::default());
    assert!(!session.is_dirty());

    session.draft_mut().auto_delete_after_days = 60;
    session.mappings_mut().add(MediaType::Tv);
    session
        .mappings_mut()
        .update_at(0, shelflife::engine::MappingField::Source, "/tv", MediaType::Tv);
    assert!(session.is_dirty());

    session.commit(&api).await.unwrap();
    assert!(!session.is_dirty());

    let saved = api.last_saved.lock().unwrap().clone().unwrap();
    assert_eq!(saved.auto_delete_after_days, 60);
    assert_eq!(saved.archive_mappings.len(), 1);
    assert_eq!(saved.archive_mappings[0].source, "/tv");
}

#[tokio::test]
async fn failed_commit_keeps_the_draft_editable() {
    let api = ScriptedCoordinator {
        fail_save: true,
        ..Default::default()
    };
    let mut session = SettingsSession::new(Settings::default());

    session.draft_mut().keep_free_space = 1000;
    let err = session.commit(&api).await.unwrap_err();
    assert_matches!(err, EngineError::ActionFailure(ref message) if message == "disk full");

    // The edit survives the failure and can be retried or discarded.
    assert!(session.is_dirty());
    assert_eq!(session.draft().keep_free_space, 1000);

    session.discard();
    assert!(!session.is_dirty());
    assert_eq!(session.draft().keep_free_space, 500);
}
