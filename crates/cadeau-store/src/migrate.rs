//! One-time migration of the legacy `admin_users` slot into the current
//! user list.
//!
//! The routine runs at most once per process (in-memory guard) and at most
//! once per session (session-slot guard); the guards are independent and
//! both are set on the first attempt whether or not any records moved.

use rand::Rng;
use serde_json::Value;

use crate::constants::{
    LEGACY_MIGRATED_KEY, LEGACY_USERS_KEY, SESSION_MIGRATED_ONCE_KEY,
};
use crate::models::{UserRecord, UserRole, UserStatus};
use crate::slots::SessionSlots;
use crate::startup::StartupGuards;
use crate::users::UserStore;

/// Merge legacy records into the current user list.
///
/// Records are normalized to the current shape, then deduplicated against
/// the current list by [`UserRecord::merge_key`] with first occurrence
/// winning; current records are added first and therefore take priority.
/// The merged set is persisted only when the record count changed, but the
/// legacy slot is always deleted (and marked migrated) once it held records.
pub fn migrate_legacy_users(
    store: &UserStore,
    guards: &mut StartupGuards,
    session: &SessionSlots,
) {
    if guards.migration_ran {
        return;
    }
    guards.migration_ran = true;

    if session.get(SESSION_MIGRATED_ONCE_KEY).as_deref() == Some("1") {
        return;
    }
    session.set(SESSION_MIGRATED_ONCE_KEY, "1");

    let legacy_json = match store.slots().get(LEGACY_USERS_KEY) {
        Some(json) => json,
        None => return,
    };

    let legacy: Vec<Value> = match serde_json::from_str(&legacy_json) {
        Ok(Value::Array(items)) => items,
        Ok(_) | Err(_) => {
            tracing::warn!("legacy user slot did not parse as an array, skipping");
            Vec::new()
        }
    };
    if legacy.is_empty() {
        return;
    }

    let current = store.users();
    let migrated: Vec<UserRecord> = legacy.iter().map(normalize_legacy).collect();

    let mut merged: Vec<UserRecord> = Vec::with_capacity(current.len() + migrated.len());
    let mut seen = std::collections::HashSet::new();
    for user in current.iter().chain(migrated.iter()) {
        if seen.insert(user.merge_key()) {
            merged.push(user.clone());
        }
    }

    if merged.len() != current.len() {
        tracing::info!(
            before = current.len(),
            after = merged.len(),
            "merged legacy users into the current list"
        );
        store.save_users(&merged);
    }

    if let Err(e) = store.slots().remove(LEGACY_USERS_KEY) {
        tracing::warn!(error = %e, "failed to delete legacy user slot");
    }
    if let Err(e) = store.slots().set(LEGACY_MIGRATED_KEY, "true") {
        tracing::warn!(error = %e, "failed to set migration marker");
    }
}

/// Normalize one legacy record into the current shape, defaulting every
/// absent field.
fn normalize_legacy(raw: &Value) -> UserRecord {
    let id = match raw.get("id") {
        // Legacy ids can be fractional (millisecond timestamp plus a random
        // jitter below 1.0); truncation keeps the record's identity.
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    // A record without an id gets a fresh millisecond id; the jitter keeps
    // two such records in one batch from colliding.
    let id = id.unwrap_or_else(|| {
        chrono::Utc::now().timestamp_millis() + rand::thread_rng().gen_range(0..1000)
    });

    let join_date = raw
        .get("joinDate")
        .and_then(Value::as_str)
        .map(str::to_string);
    let created_at = join_date
        .as_deref()
        .and_then(parse_flexible_date)
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    let role = match raw.get("role").and_then(Value::as_str) {
        Some("admin") => UserRole::Admin,
        _ => UserRole::User,
    };
    let status = match raw.get("status").and_then(Value::as_str) {
        Some("banned") => UserStatus::Banned,
        _ => UserStatus::Active,
    };

    UserRecord {
        id,
        name: str_field(raw, "name"),
        email: str_field(raw, "email"),
        phone: str_field(raw, "phone"),
        role,
        password_hash: normalize_digest(str_field(raw, "passwordHash")),
        created_at,
        orders: raw.get("orders").and_then(Value::as_u64).unwrap_or(0),
        total_spent: raw
            .get("totalSpent")
            .and_then(Value::as_str)
            .unwrap_or("0")
            .to_string(),
        status,
        join_date,
        visible_gift_cards: gift_cards_field(raw),
    }
}

/// Legacy digests are bare SHA-256 hex, which the current verifier cannot
/// check.  Only PHC-format hashes survive migration; everything else is
/// blanked, marking the account as needing re-registration.
fn normalize_digest(digest: String) -> String {
    if digest.starts_with('$') {
        digest
    } else {
        String::new()
    }
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

fn gift_cards_field(raw: &Value) -> Vec<u64> {
    match raw.get("visibleGiftCards") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_u64).collect(),
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Parse a legacy join date: RFC 3339 first, then a bare `YYYY-MM-DD`.
fn parse_flexible_date(s: &str) -> Option<String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&chrono::Utc).to_rfc3339());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(dt.to_rfc3339());
    }
    None
}
