//! # cadeau-sync
//!
//! Best-effort replication of the user list between storefront instances.
//! One process hosts the [`SyncHub`] routes; every process pushes its saves
//! there and periodically pulls, adopting the hub copy under a length-biased
//! last-writer-wins rule.  Explicitly a development convenience: failures
//! are logged at debug and otherwise invisible.

pub mod client;
pub mod hub;
pub mod task;

pub use client::SyncClient;
pub use hub::{router as sync_router, SyncHub};
pub use task::spawn_replication;
