//! # cadeau-store
//!
//! Slot-backed local storage for the Cadeau account service.
//!
//! The web storefront kept everything in browser-local key/value slots;
//! this crate reproduces that model on disk.  It owns the persisted
//! user list (with a one-generation backup slot), the one-time legacy-record
//! migration, and the change-notification channel the rest of the system
//! subscribes to.

pub mod constants;
pub mod migrate;
pub mod models;
pub mod slots;
pub mod startup;
pub mod users;

mod error;

pub use error::StoreError;
pub use models::{UserRecord, UserRole, UserStatus};
pub use slots::{SessionSlots, SlotStore};
pub use startup::StartupGuards;
pub use users::{StoreEvent, UserStore};
