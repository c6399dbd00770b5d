//! Registration and login.
//!
//! Both operations return plain `Result` values; every failure a form can
//! show is an [`AuthError`], and nothing here panics across the public
//! boundary.

use cadeau_store::{UserRecord, UserRole, UserStatus, UserStore};

use crate::error::{AuthError, Result};
use crate::password::{hash_password, verify_password, PasswordError};
use crate::session::set_session;

/// Create a new account.
///
/// Uniqueness is checked only for non-empty identifiers: a candidate with an
/// empty email never collides on email, and likewise for phone.  Two
/// accounts may therefore both leave the email empty as long as their
/// phones differ.
pub fn register(
    store: &UserStore,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<UserRecord> {
    let email = email.trim();
    let phone = phone.trim();

    let mut users = store.users();
    let duplicate = users.iter().any(|u| {
        (!email.is_empty() && !u.email.is_empty() && u.email == email)
            || (!phone.is_empty() && !u.phone.is_empty() && u.phone == phone)
    });
    if duplicate {
        tracing::debug!(email, phone, "registration rejected: duplicate identifier");
        return Err(AuthError::DuplicateIdentifier);
    }

    let password_hash = hash_password(password)?;
    let now = chrono::Utc::now();

    let record = UserRecord {
        id: now.timestamp_millis(),
        name: name.trim().to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: UserRole::User,
        password_hash,
        created_at: now.to_rfc3339(),
        orders: 0,
        total_spent: "0".to_string(),
        status: UserStatus::Active,
        join_date: None,
        visible_gift_cards: Vec::new(),
    };

    users.push(record.clone());
    store.save_users(&users);
    tracing::info!(id = record.id, "registered new user");

    Ok(record)
}

/// Authenticate with an email or phone identifier.
///
/// An identifier containing `@` is matched against emails only, anything
/// else against phones only.  On success the session marker and its
/// convenience mirrors are written.  A failed attempt leaves any prior
/// session untouched.
pub fn login(store: &UserStore, identifier: &str, password: &str) -> Result<UserRecord> {
    let identifier = identifier.trim();
    let is_email = identifier.contains('@');

    let users = store.users();
    let user = users
        .iter()
        .find(|u| {
            if is_email {
                u.email == identifier
            } else {
                u.phone == identifier
            }
        })
        .ok_or(AuthError::InvalidCredentials)?;

    // Migrated records can arrive without a credential hash; they must
    // re-register before they can log in.
    if user.password_hash.is_empty() {
        return Err(AuthError::PasswordResetRequired);
    }

    // A stored hash the verifier cannot parse (e.g. a legacy digest that
    // slipped past migration) is treated like an empty one: the account
    // needs its password set again.
    match verify_password(password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return Err(AuthError::InvalidCredentials),
        Err(PasswordError::Malformed(_)) => return Err(AuthError::PasswordResetRequired),
        Err(e) => return Err(e.into()),
    }

    set_session(store, user);
    tracing::info!(id = user.id, "user logged in");

    Ok(user.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{is_logged_in, session_user};
    use cadeau_store::constants::SESSION_USER_ID_KEY;
    use cadeau_store::SlotStore;

    fn store_at(dir: &std::path::Path) -> UserStore {
        UserStore::new(SlotStore::open_at(dir).unwrap())
    }

    #[test]
    fn register_then_login_by_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        let created = register(&store, "Sara", "a@example.com", "0911", "Secret123").unwrap();
        assert_eq!(created.role, UserRole::User);
        assert_eq!(created.status, UserStatus::Active);

        let user = login(&store, "a@example.com", "Secret123").unwrap();
        assert_eq!(user.email, "a@example.com");
        assert_eq!(
            store.slots().get(SESSION_USER_ID_KEY).as_deref(),
            Some(user.id.to_string().as_str())
        );
        assert!(is_logged_in(&store));
    }

    #[test]
    fn wrong_password_is_generic_and_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        register(&store, "Sara", "a@example.com", "0911", "Secret123").unwrap();

        let err = login(&store, "0911", "WrongPass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.slots().get(SESSION_USER_ID_KEY), None);
        assert!(session_user(&store).is_none());
    }

    #[test]
    fn unknown_identifier_reads_the_same_as_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        register(&store, "Sara", "a@example.com", "", "Secret123").unwrap();

        let unknown = login(&store, "b@example.com", "Secret123").unwrap_err();
        let wrong = login(&store, "a@example.com", "Nope").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn identifier_shape_selects_the_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        register(&store, "Sara", "a@example.com", "0911", "Secret123").unwrap();

        // A phone-shaped identifier only ever matches the phone field, an
        // email-shaped one only the email field.
        assert!(login(&store, "0911", "Secret123").is_ok());
        assert!(matches!(
            login(&store, "a@example.com", "Secret123"),
            Ok(u) if u.phone == "0911"
        ));
    }

    #[test]
    fn duplicate_email_and_phone_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        register(&store, "Sara", "a@example.com", "0911", "Secret123").unwrap();

        let err = register(&store, "Mina", "a@example.com", "0912", "Other456").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentifier));

        let err = register(&store, "Mina", "b@example.com", "0911", "Other456").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentifier));

        assert_eq!(store.users().len(), 1);
    }

    // Documented quirk: empty identifiers never collide, so two accounts
    // may both have an empty email as long as their phones differ.
    #[test]
    fn empty_emails_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        register(&store, "Sara", "", "0911", "Secret123").unwrap();
        register(&store, "Mina", "", "0912", "Other456").unwrap();
        assert_eq!(store.users().len(), 2);
    }

    #[test]
    fn legacy_hex_digest_demands_a_reset_not_an_undocumented_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        // A record carrying the old unsalted SHA-256 hex digest.
        let legacy: UserRecord = serde_json::from_value(serde_json::json!({
            "id": 6,
            "name": "Old",
            "email": "old@example.com",
            "passwordHash": "e3".repeat(32),
        }))
        .unwrap();
        store.save_users(&[legacy]);

        let err = login(&store, "old@example.com", "Secret123").unwrap_err();
        assert!(matches!(err, AuthError::PasswordResetRequired));
    }

    #[test]
    fn empty_stored_hash_demands_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        // An incompletely migrated record: no credential hash.
        let unmigrated: UserRecord = serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "Old",
            "email": "old@example.com",
            "passwordHash": "",
        }))
        .unwrap();
        store.save_users(&[unmigrated]);

        let err = login(&store, "old@example.com", "whatever").unwrap_err();
        assert!(matches!(err, AuthError::PasswordResetRequired));
    }
}
