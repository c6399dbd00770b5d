//! Default admin seeding.
//!
//! Demo deployments need a known admin account.  Seeding is guarded the
//! same way migration is (per-process flag plus session-slot marker) and
//! only ever creates the account when no admin exists.

use cadeau_store::constants::SESSION_ADMIN_SEEDED_ONCE_KEY;
use cadeau_store::{SessionSlots, StartupGuards, UserRecord, UserRole, UserStatus, UserStore};

use crate::password::hash_password;

/// Fixed demo credentials; tests and demo walkthroughs rely on them.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@12345";

/// Seed the default admin account if none exists.
///
/// Runs at most once per process and per session.  The session marker is
/// only set once an account was actually created, so a later session can
/// still seed if an admin never materialized.
pub fn seed_admin(store: &UserStore, guards: &mut StartupGuards, session: &SessionSlots) {
    if guards.admin_seeded {
        return;
    }
    guards.admin_seeded = true;

    if session.get(SESSION_ADMIN_SEEDED_ONCE_KEY).as_deref() == Some("1") {
        return;
    }

    let mut users = store.users();
    if !users.is_empty() {
        let admin_exists = users
            .iter()
            .any(|u| u.role == UserRole::Admin || u.email == DEFAULT_ADMIN_EMAIL);
        if admin_exists {
            return;
        }
    }

    let password_hash = match hash_password(DEFAULT_ADMIN_PASSWORD) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash admin credential, not seeding");
            return;
        }
    };

    let now = chrono::Utc::now();
    let admin = UserRecord {
        id: now.timestamp_millis(),
        name: "System Administrator".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        phone: String::new(),
        role: UserRole::Admin,
        password_hash,
        created_at: now.to_rfc3339(),
        orders: 0,
        total_spent: "0".to_string(),
        status: UserStatus::Active,
        join_date: None,
        visible_gift_cards: Vec::new(),
    };

    tracing::info!(email = DEFAULT_ADMIN_EMAIL, "seeding default admin user");
    users.push(admin);
    store.save_users(&users);

    session.set(SESSION_ADMIN_SEEDED_ONCE_KEY, "1");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::ops::{login, register};
    use cadeau_store::SlotStore;

    fn store_at(dir: &std::path::Path) -> UserStore {
        UserStore::new(SlotStore::open_at(dir).unwrap())
    }

    #[test]
    fn seeds_into_an_empty_store_and_logs_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        seed_admin(&store, &mut StartupGuards::new(), &SessionSlots::new());

        let admin = login(&store, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD).unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let err = login(&store, DEFAULT_ADMIN_EMAIL, "NotThePassword").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn does_not_seed_when_an_admin_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        seed_admin(&store, &mut StartupGuards::new(), &SessionSlots::new());
        assert_eq!(store.users().len(), 1);

        // Fresh guards and session: still a no-op because the admin exists.
        seed_admin(&store, &mut StartupGuards::new(), &SessionSlots::new());
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn guards_suppress_a_second_attempt_in_the_same_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        let mut guards = StartupGuards::new();
        let session = SessionSlots::new();

        register(&store, "Sara", "a@example.com", "", "Secret123").unwrap();
        seed_admin(&store, &mut guards, &session);
        let count = store.users().len();
        assert_eq!(count, 2);

        seed_admin(&store, &mut guards, &session);
        assert_eq!(store.users().len(), count);
    }
}
