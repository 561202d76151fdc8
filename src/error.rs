//! Error taxonomy for the lifecycle engine.
//!
//! Every failure is scoped to one operation and recoverable by an explicit
//! retry; nothing here is fatal to the process.

use thiserror::Error;

use crate::engine::sync::ViewId;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A view's data could not be fetched. The view keeps its previous data
    /// set and records the message for an error banner.
    #[error("failed to load {view} view: {message}")]
    LoadFailure { view: ViewId, message: String },

    /// An archive/delete/sync/cleanup dispatch failed remotely. No local
    /// state was mutated.
    #[error("{0}")]
    ActionFailure(String),

    /// A dispatch was refused client-side before any network call.
    #[error("{0}")]
    ValidationGap(String),

    /// A remote manager could not be reached or returned a non-success
    /// status. Never silently replaced with an empty result.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl EngineError {
    /// The user-visible message, without the taxonomy prefix.
    pub fn message(&self) -> &str {
        match self {
            EngineError::LoadFailure { message, .. } => message,
            EngineError::ActionFailure(message) => message,
            EngineError::ValidationGap(message) => message,
            EngineError::UpstreamUnavailable(message) => message,
        }
    }
}
