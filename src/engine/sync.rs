//! Per-view data loading with stale-response suppression.
//!
//! Each `activate` hands out a [`LoadTicket`] carrying a generation number;
//! a response is committed only when its ticket still matches the current
//! generation. There is no request cancellation: a late response for a
//! no-longer-active view is detected and discarded instead, so data can
//! never bleed across views.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::api::CoordinatorApi;
use crate::error::EngineError;
use crate::models::{ConnectionStatus, DashboardData, MediaItem, RootFolderCatalogs, Settings};

/// The tabs the synchronizer coordinates. The logs view is self-contained
/// and fetches independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Dashboard,
    Content,
    Settings,
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewId::Dashboard => f.write_str("dashboard"),
            ViewId::Content => f.write_str("content"),
            ViewId::Settings => f.write_str("settings"),
        }
    }
}

/// The settings view's three fetches, committed only as a whole.
#[derive(Debug, Clone)]
pub struct SettingsViewData {
    pub settings: Settings,
    pub status: ConnectionStatus,
    pub root_folders: RootFolderCatalogs,
}

/// A view's data set, replaced wholesale on each successful load.
#[derive(Debug, Clone)]
pub enum ViewDataSet {
    Dashboard(DashboardData),
    Content(Vec<MediaItem>),
    Settings(SettingsViewData),
}

/// Proof of which view and generation a load was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    view: ViewId,
    generation: u64,
}

impl LoadTicket {
    pub fn view(&self) -> ViewId {
        self.view
    }
}

/// What [`TabSynchronizer::commit`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// The response belonged to a superseded load and was discarded.
    DiscardedStale,
}

/// Per-view loading state machine. Owns every [`ViewDataSet`].
#[derive(Debug)]
pub struct TabSynchronizer {
    active: ViewId,
    generation: u64,
    loading: bool,
    data: HashMap<ViewId, ViewDataSet>,
    errors: HashMap<ViewId, String>,
}

impl Default for TabSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TabSynchronizer {
    pub fn new() -> Self {
        Self {
            active: ViewId::Dashboard,
            generation: 0,
            loading: false,
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn active_view(&self) -> ViewId {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The committed data set for a view, if any. Stale-but-visible: a failed
    /// reload leaves the previous set in place.
    pub fn data(&self, view: ViewId) -> Option<&ViewDataSet> {
        self.data.get(&view)
    }

    /// The recorded load error for a view, cleared by the next success.
    pub fn error(&self, view: ViewId) -> Option<&str> {
        self.errors.get(&view).map(String::as_str)
    }

    pub fn dashboard(&self) -> Option<&DashboardData> {
        match self.data.get(&ViewId::Dashboard) {
            Some(ViewDataSet::Dashboard(data)) => Some(data),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&[MediaItem]> {
        match self.data.get(&ViewId::Content) {
            Some(ViewDataSet::Content(items)) => Some(items),
            _ => None,
        }
    }

    pub fn settings(&self) -> Option<&SettingsViewData> {
        match self.data.get(&ViewId::Settings) {
            Some(ViewDataSet::Settings(view)) => Some(view),
            _ => None,
        }
    }

    /// Makes `view` active and begins a load for it. Any in-flight load's
    /// ticket is superseded, not cancelled.
    pub fn activate(&mut self, view: ViewId) -> LoadTicket {
        self.generation += 1;
        self.active = view;
        self.loading = true;
        debug!(view = %view, generation = self.generation, "View activated, load issued");
        LoadTicket {
            view,
            generation: self.generation,
        }
    }

    /// Explicit operator-triggered retry: repeats the protocol for the
    /// active view from the top.
    pub fn retry(&mut self) -> LoadTicket {
        info!(view = %self.active, "Retrying view load");
        self.activate(self.active)
    }

    /// Applies a load result if its ticket is still current; otherwise the
    /// response is discarded without touching any view's state.
    pub fn commit(
        &mut self,
        ticket: LoadTicket,
        result: Result<ViewDataSet, EngineError>,
    ) -> Commit {
        if ticket.generation != self.generation {
            warn!(
                view = %ticket.view,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale view response"
            );
            return Commit::DiscardedStale;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.errors.remove(&ticket.view);
                self.data.insert(ticket.view, data);
                debug!(view = %ticket.view, "View data committed");
            }
            Err(e) => {
                warn!(view = %ticket.view, error = %e, "View load failed");
                self.errors.insert(ticket.view, e.message().to_string());
            }
        }
        Commit::Applied
    }

    /// Convenience driver: activate, fetch and commit in one call.
    pub async fn load(&mut self, api: &dyn CoordinatorApi, view: ViewId) -> Result<(), EngineError> {
        let ticket = self.activate(view);
        let result = fetch_view(api, view).await;
        let failed = result.as_ref().err().map(|e| e.message().to_string());
        self.commit(ticket, result);
        match failed {
            None => Ok(()),
            Some(message) => Err(EngineError::LoadFailure { view, message }),
        }
    }
}

/// Fetches the data set a view requires.
///
/// The settings view issues its three fetches together and commits
/// atomically; partial success is total failure for the view.
pub async fn fetch_view(
    api: &dyn CoordinatorApi,
    view: ViewId,
) -> Result<ViewDataSet, EngineError> {
    let load_failure = |e: crate::api::ApiError| EngineError::LoadFailure {
        view,
        message: e.message(),
    };
    match view {
        ViewId::Dashboard => api
            .dashboard()
            .await
            .map(ViewDataSet::Dashboard)
            .map_err(load_failure),
        ViewId::Content => api
            .content()
            .await
            .map(ViewDataSet::Content)
            .map_err(load_failure),
        ViewId::Settings => {
            let (settings, status, root_folders) = tokio::try_join!(
                api.settings(),
                api.connection_status(),
                api.all_root_folders()
            )
            .map_err(load_failure)?;
            Ok(ViewDataSet::Settings(SettingsViewData {
                settings,
                status,
                root_folders,
            }))
        }
    }
}
