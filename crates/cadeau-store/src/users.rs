//! The user list: read with backup fallback, backup-then-write save, and
//! change notification.
//!
//! Failure policy follows the web storefront's: malformed JSON reads as "no
//! data", write failures are logged and swallowed, and nothing on this path
//! ever corrupts the backup slot.

use tokio::sync::broadcast;

use crate::constants::{USERS_BACKUP_KEY, USERS_KEY, USERS_LAST_UPDATED_KEY};
use crate::models::UserRecord;
use crate::slots::SlotStore;

/// Event emitted to subscribers whenever the user list is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    UsersUpdated,
}

/// Handle to the persisted user list.
#[derive(Debug)]
pub struct UserStore {
    slots: SlotStore,
    events: broadcast::Sender<StoreEvent>,
}

impl UserStore {
    pub fn new(slots: SlotStore) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { slots, events }
    }

    /// The underlying slot store, for session markers and migration state.
    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    /// Subscribe to change notifications.  Replaces the web client's timer
    /// polling: listeners get an event per [`save_users`](Self::save_users).
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Read the full user list.
    ///
    /// Tries the primary slot first; if its contents do not parse as a JSON
    /// array of records, falls back to the backup slot; if both fail or are
    /// absent, returns an empty list.  Never errors.
    pub fn users(&self) -> Vec<UserRecord> {
        if let Some(users) = parse_users(self.slots.get(USERS_KEY).as_deref()) {
            return users;
        }

        if let Some(users) = parse_users(self.slots.get(USERS_BACKUP_KEY).as_deref()) {
            tracing::warn!("primary user slot invalid, serving backup");
            return users;
        }

        tracing::debug!("no valid user list in storage");
        Vec::new()
    }

    /// Persist the full user list.
    ///
    /// The current primary slot is copied into the backup slot first (one
    /// generation only), then the new list and a last-updated stamp are
    /// written and subscribers are notified.  Failures leave prior state
    /// untouched and are not propagated.
    pub fn save_users(&self, users: &[UserRecord]) {
        let encoded = match serde_json::to_string(users) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode user list, not saving");
                return;
            }
        };

        if let Some(current) = self.slots.get(USERS_KEY) {
            if let Err(e) = self.slots.set(USERS_BACKUP_KEY, &current) {
                tracing::error!(error = %e, "failed to write backup slot, not saving");
                return;
            }
        }

        if let Err(e) = self.slots.set(USERS_KEY, &encoded) {
            tracing::error!(error = %e, "failed to write user list");
            return;
        }

        let stamp = chrono::Utc::now().timestamp_millis().to_string();
        if let Err(e) = self.slots.set(USERS_LAST_UPDATED_KEY, &stamp) {
            tracing::warn!(error = %e, "failed to stamp last-updated slot");
        }

        tracing::debug!(count = users.len(), "saved user list");

        // No receivers is fine; the send result only reports that.
        let _ = self.events.send(StoreEvent::UsersUpdated);
    }
}

fn parse_users(json: Option<&str>) -> Option<Vec<UserRecord>> {
    let json = json?;
    match serde_json::from_str::<Vec<UserRecord>>(json) {
        Ok(users) => Some(users),
        Err(e) => {
            tracing::warn!(error = %e, "user slot did not parse as a record array");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserRole, UserStatus};

    fn test_store(dir: &std::path::Path) -> UserStore {
        UserStore::new(SlotStore::open_at(dir).unwrap())
    }

    fn sample_user(id: i64, email: &str, phone: &str) -> UserRecord {
        UserRecord {
            id,
            name: format!("user-{id}"),
            email: email.to_string(),
            phone: phone.to_string(),
            role: UserRole::User,
            password_hash: "$argon2id$stub".to_string(),
            created_at: "2024-06-01T00:00:00Z".to_string(),
            orders: 0,
            total_spent: "0".to_string(),
            status: UserStatus::Active,
            join_date: None,
            visible_gift_cards: Vec::new(),
        }
    }

    #[test]
    fn empty_store_reads_as_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());
        assert!(store.users().is_empty());
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let users = vec![sample_user(1, "a@example.com", ""), sample_user(2, "", "0911")];
        store.save_users(&users);

        assert_eq!(store.users(), users);
        assert!(store.slots().get(USERS_LAST_UPDATED_KEY).is_some());
    }

    #[test]
    fn corrupt_primary_falls_back_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let users = vec![sample_user(1, "a@example.com", "")];
        store.save_users(&users);
        store.save_users(&users); // second save makes the backup valid too

        store.slots().set(USERS_KEY, "{not json").unwrap();
        assert_eq!(store.users(), users);
    }

    #[test]
    fn corrupt_primary_and_backup_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.slots().set(USERS_KEY, "garbage").unwrap();
        store.slots().set(USERS_BACKUP_KEY, "also garbage").unwrap();
        assert!(store.users().is_empty());
    }

    #[test]
    fn resave_of_read_list_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let users = vec![sample_user(7, "x@example.com", "0912")];
        store.save_users(&users);
        let primary_before = store.slots().get(USERS_KEY).unwrap();

        store.save_users(&store.users());

        let primary_after = store.slots().get(USERS_KEY).unwrap();
        let backup_after = store.slots().get(USERS_BACKUP_KEY).unwrap();
        assert_eq!(primary_before, primary_after);
        assert_eq!(primary_after, backup_after);
    }

    #[test]
    fn save_notifies_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());
        let mut rx = store.subscribe();

        store.save_users(&[sample_user(1, "a@example.com", "")]);
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::UsersUpdated);
    }
}
