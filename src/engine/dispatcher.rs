//! Archive/delete action dispatch with explicit confirmation.
//!
//! One dispatcher drives one item-action request at a time:
//!
//! ```text
//! Idle --delete--> AwaitingConfirmation --confirm--> (dispatch) --> Idle
//! Idle --archive-> (resolve folders) --> AwaitingFolderSelection
//!                  --confirm+selection--> (dispatch) --> Idle on success,
//!                                          back to AwaitingFolderSelection on failure
//! ```
//!
//! `Dispatching` is the await inside [`ActionDispatcher::confirm`]; because
//! the dispatcher is `&mut self`, cancel is reachable from every state except
//! mid-dispatch, which is exactly the contract. A pending archive request is
//! discarded only on explicit cancel or successful dispatch.

use tracing::{info, warn};

use crate::api::CoordinatorApi;
use crate::engine::catalog;
use crate::error::EngineError;
use crate::models::{ActionOutcome, ActionRequest, FolderChoice, ItemAction, ItemProjection, MediaItem};

/// An archive request held between "archive requested" and confirm/cancel.
#[derive(Debug, Clone)]
pub struct PendingArchiveRequest {
    pub item: MediaItem,
    pub folders: Vec<FolderChoice>,
    /// Index into `folders`. `None` when the catalog came back empty, in
    /// which case confirmation is impossible.
    pub selected: Option<usize>,
}

impl PendingArchiveRequest {
    pub fn selected_folder(&self) -> Option<&FolderChoice> {
        self.selected.and_then(|index| self.folders.get(index))
    }
}

#[derive(Debug, Clone, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    /// A delete waiting for the irreversible-action guard.
    AwaitingConfirmation { item: MediaItem },
    /// An archive waiting for a destination choice.
    AwaitingFolderSelection { pending: PendingArchiveRequest },
}

#[derive(Debug, Default)]
pub struct ActionDispatcher {
    state: DispatchState,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DispatchState::Idle)
    }

    /// Requests a delete. No network effect happens until the explicit
    /// confirmation step; this guard is never bypassed.
    pub fn request_delete(&mut self, item: MediaItem) -> Result<(), EngineError> {
        self.require_idle()?;
        info!(title = %item.title, "Delete requested, awaiting confirmation");
        self.state = DispatchState::AwaitingConfirmation { item };
        Ok(())
    }

    /// Requests an archive: resolves the folder catalog for the item's type
    /// and moves to folder selection, defaulting to the first entry when one
    /// exists. A resolver failure leaves the dispatcher idle.
    pub async fn request_archive(
        &mut self,
        api: &dyn CoordinatorApi,
        item: MediaItem,
    ) -> Result<(), EngineError> {
        self.require_idle()?;
        let folders = catalog::list_folders(api, item.media_type).await?;
        let selected = if folders.is_empty() { None } else { Some(0) };
        if selected.is_none() {
            warn!(
                title = %item.title,
                manager = item.media_type.manager_name(),
                "Archive requested but the manager has no root folders configured"
            );
        }
        self.state = DispatchState::AwaitingFolderSelection {
            pending: PendingArchiveRequest {
                item,
                folders,
                selected,
            },
        };
        Ok(())
    }

    /// Changes the selected destination of a pending archive request.
    pub fn select_folder(&mut self, index: usize) -> Result<(), EngineError> {
        match &mut self.state {
            DispatchState::AwaitingFolderSelection { pending } => {
                if index >= pending.folders.len() {
                    return Err(EngineError::ValidationGap(format!(
                        "Folder selection {index} is out of range"
                    )));
                }
                pending.selected = Some(index);
                Ok(())
            }
            _ => Err(EngineError::ValidationGap(
                "No archive request is awaiting a folder selection".to_string(),
            )),
        }
    }

    /// Confirms the pending action and dispatches it.
    ///
    /// Delete: success and failure both return to idle (the item itself is
    /// never mutated locally). Archive: failure keeps the pending request so
    /// the dialog stays dismissible rather than silently discarding it.
    /// The caller reloads the active view after a success.
    pub async fn confirm(
        &mut self,
        api: &dyn CoordinatorApi,
    ) -> Result<ActionOutcome, EngineError> {
        match std::mem::take(&mut self.state) {
            DispatchState::Idle => Err(EngineError::ValidationGap(
                "No action is awaiting confirmation".to_string(),
            )),
            DispatchState::AwaitingConfirmation { item } => {
                let request = ActionRequest {
                    action: ItemAction::Delete,
                    item: ItemProjection::from_item(&item),
                    archive_path: None,
                };
                match api.execute_action(&item.id, &request).await {
                    Ok(outcome) => {
                        info!(title = %item.title, "Delete dispatched");
                        Ok(outcome)
                    }
                    Err(e) => {
                        warn!(title = %item.title, error = %e, "Delete dispatch failed");
                        Err(EngineError::ActionFailure(e.message()))
                    }
                }
            }
            DispatchState::AwaitingFolderSelection { pending } => {
                let Some(destination) = pending.selected_folder().cloned() else {
                    // Refused client-side before any network call.
                    self.state = DispatchState::AwaitingFolderSelection { pending };
                    return Err(EngineError::ValidationGap(
                        "No archive folder is selected".to_string(),
                    ));
                };
                let request = ActionRequest {
                    action: ItemAction::Archive,
                    item: ItemProjection::from_item(&pending.item),
                    archive_path: Some(destination.path.clone()),
                };
                match api.execute_action(&pending.item.id, &request).await {
                    Ok(outcome) => {
                        info!(
                            title = %pending.item.title,
                            destination = %destination.path,
                            "Archive dispatched"
                        );
                        Ok(outcome)
                    }
                    Err(e) => {
                        warn!(title = %pending.item.title, error = %e, "Archive dispatch failed");
                        self.state = DispatchState::AwaitingFolderSelection { pending };
                        Err(EngineError::ActionFailure(e.message()))
                    }
                }
            }
        }
    }

    /// Discards any pending request without side effects.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            info!("Pending action cancelled");
        }
        self.state = DispatchState::Idle;
    }

    fn require_idle(&self) -> Result<(), EngineError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(EngineError::ValidationGap(
                "Another action is already pending; confirm or cancel it first".to_string(),
            ))
        }
    }
}
