//! Names of the persistent and session-scoped storage slots.

/// Primary slot: JSON array of [`UserRecord`](crate::models::UserRecord).
pub const USERS_KEY: &str = "users";

/// Backup slot: the previous contents of [`USERS_KEY`], one generation deep.
pub const USERS_BACKUP_KEY: &str = "users_backup";

/// Unix-millisecond timestamp of the last successful save.
pub const USERS_LAST_UPDATED_KEY: &str = "users_last_updated";

/// Session marker: the `id` of the logged-in user, as a decimal string.
pub const SESSION_USER_ID_KEY: &str = "session_user_id";

/// Convenience mirrors of the session user, written on login.
pub const USER_NAME_KEY: &str = "user_name";
pub const USER_EMAIL_KEY: &str = "user_email";
pub const USER_PHONE_KEY: &str = "user_phone";

/// Legacy slot holding the pre-migration record array.  Deleted once
/// migration has run.
pub const LEGACY_USERS_KEY: &str = "admin_users";

/// Persistent marker set after the legacy slot has been migrated.
pub const LEGACY_MIGRATED_KEY: &str = "admin_users_migrated";

/// Session-scoped guard keys (live in [`SessionSlots`](crate::slots::SessionSlots)).
pub const SESSION_MIGRATED_ONCE_KEY: &str = "admin_users_migrated_once";
pub const SESSION_ADMIN_SEEDED_ONCE_KEY: &str = "admin_seeded_once";
