//! The action workflow and mapping resolution engine.
//!
//! Every structure here is single-owner and mutated through `&mut self`; the
//! cooperative scheduling model means no two views' handlers ever run
//! concurrently, so there is no locking anywhere in the engine.

pub mod catalog;
pub mod content;
pub mod dispatcher;
pub mod mappings;
pub mod settings_session;
pub mod storage;
pub mod sync;

pub use catalog::list_folders;
pub use content::{ContentPage, ContentQuery, SortKey};
pub use dispatcher::{ActionDispatcher, DispatchState, PendingArchiveRequest};
pub use mappings::{MappingField, MappingId, MappingTable};
pub use settings_session::SettingsSession;
pub use storage::{StorageAccounting, format_gb};
pub use sync::{
    Commit, LoadTicket, SettingsViewData, TabSynchronizer, ViewDataSet, ViewId, fetch_view,
};
