//! # tally-store
//!
//! Inventory state for Tally and the service that orchestrates every
//! mutation of it.
//!
//! State is held in memory and persisted as an append-only JSONL trail, one
//! file per inventory session under `.tally/trail/`. Opening a store replays
//! the trail; there is no other persistence.
//!
//! [`InventoryService`] is the only writer. For every assignment change it
//! checks the owning session is still active, runs the pure engine
//! operation, re-checks the stored status under the write lock
//! (compare-and-swap), appends the new state to the trail, and only then
//! commits it in memory.

pub mod error;
pub mod service;
pub mod state;
pub mod trail;

pub use error::StoreError;
pub use service::InventoryService;
pub use state::InventoryState;
