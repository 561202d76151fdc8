//! An explicit edit session over the loaded configuration.
//!
//! The draft is a single-owner structure mutated only by the active view's
//! handlers, with an explicit commit/discard boundary. Mapping edits go
//! through the session's [`MappingTable`] and are folded back into the flat
//! stored sequence at commit time.

use tracing::info;

use crate::api::CoordinatorApi;
use crate::engine::mappings::MappingTable;
use crate::error::EngineError;
use crate::models::Settings;

#[derive(Debug)]
pub struct SettingsSession {
    original: Settings,
    draft: Settings,
    mappings: MappingTable,
}

impl SettingsSession {
    /// Opens a session over a freshly loaded configuration.
    pub fn new(settings: Settings) -> Self {
        let mappings = MappingTable::from_flat(&settings.archive_mappings);
        Self {
            original: settings.clone(),
            draft: settings,
            mappings,
        }
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Settings {
        &mut self.draft
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    pub fn mappings_mut(&mut self) -> &mut MappingTable {
        &mut self.mappings
    }

    pub fn is_dirty(&self) -> bool {
        let mut effective = self.draft.clone();
        effective.archive_mappings = self.mappings.to_flat();
        effective != self.original
    }

    /// Persists the draft through the settings save path. On failure the
    /// draft is left intact; the failure message is surfaced verbatim.
    pub async fn commit(&mut self, api: &dyn CoordinatorApi) -> Result<(), EngineError> {
        self.draft.archive_mappings = self.mappings.to_flat();
        api.save_settings(&self.draft)
            .await
            .map_err(|e| EngineError::ActionFailure(e.message()))?;
        info!("Settings committed");
        self.original = self.draft.clone();
        Ok(())
    }

    /// Drops every draft edit and returns to the loaded configuration.
    pub fn discard(&mut self) {
        self.draft = self.original.clone();
        self.mappings = MappingTable::from_flat(&self.draft.archive_mappings);
    }
}
