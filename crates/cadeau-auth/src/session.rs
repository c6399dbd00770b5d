//! Session marker lifecycle.
//!
//! "Logged in" is defined entirely by the presence of a resolvable session
//! marker: a slot holding one record's id.  There is no expiry and no token
//! refresh; the state machine is anonymous <-> authenticated.

use cadeau_store::constants::{
    SESSION_USER_ID_KEY, USER_EMAIL_KEY, USER_NAME_KEY, USER_PHONE_KEY,
};
use cadeau_store::{UserRecord, UserStore};

/// Resolve the current session user.
///
/// An absent marker returns `None` without reading the user list.  A marker
/// that points at a now-missing id (stale) also resolves to `None`.
pub fn session_user(store: &UserStore) -> Option<UserRecord> {
    let marker = store.slots().get(SESSION_USER_ID_KEY)?;
    store
        .users()
        .into_iter()
        .find(|u| u.id.to_string() == marker)
}

/// Whether a session user currently resolves.
pub fn is_logged_in(store: &UserStore) -> bool {
    session_user(store).is_some()
}

/// Write the session marker and its convenience mirrors for `user`.
pub(crate) fn set_session(store: &UserStore, user: &UserRecord) {
    let slots = store.slots();
    for (key, value) in [
        (SESSION_USER_ID_KEY, user.id.to_string()),
        (USER_EMAIL_KEY, user.email.clone()),
        (USER_PHONE_KEY, user.phone.clone()),
        (USER_NAME_KEY, user.name.clone()),
    ] {
        if let Err(e) = slots.set(key, &value) {
            tracing::error!(key, error = %e, "failed to write session slot");
        }
    }
}

/// Clear the session marker and convenience mirrors.
pub fn logout(store: &UserStore) {
    let slots = store.slots();
    for key in [
        SESSION_USER_ID_KEY,
        USER_EMAIL_KEY,
        USER_PHONE_KEY,
        USER_NAME_KEY,
    ] {
        if let Err(e) = slots.remove(key) {
            tracing::warn!(key, error = %e, "failed to clear session slot");
        }
    }
}
