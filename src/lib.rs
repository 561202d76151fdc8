//! Shelflife: storage-lifecycle coordination for a media library split
//! across a hot serving pool and a cold archive pool.
//!
//! The crate is the client core of the coordinator: it classifies loaded
//! items into actionable states, resolves archive destinations through a
//! type-partitioned mapping table, drives the confirm/execute protocol for
//! archive and delete actions, and keeps per-view state consistent through
//! generation-checked asynchronous loads.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
