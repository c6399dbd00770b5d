//! User record model persisted in the slot store.
//!
//! Field names serialize in camelCase so the JSON layout matches what the
//! storefront already has on disk, legacy records included.

use serde::{Deserialize, Deserializer, Serialize};

/// Role of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Account status.  Declared for the admin surface; nothing in the auth
/// path enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Banned,
}

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Millisecond timestamp at creation time.  Not guaranteed unique under
    /// rapid concurrent creation.
    pub id: i64,
    /// Display name, free text.
    #[serde(default)]
    pub name: String,
    /// Optional identifier; uniqueness checked only when non-empty.
    #[serde(default)]
    pub email: String,
    /// Optional identifier; uniqueness checked only when non-empty.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: UserRole,
    /// PHC-format credential hash.  Empty string marks a record that cannot
    /// authenticate (e.g. incompletely migrated).
    #[serde(default)]
    pub password_hash: String,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub orders: u64,
    #[serde(default = "default_total_spent")]
    pub total_spent: String,
    #[serde(default)]
    pub status: UserStatus,
    /// Original join date of a legacy record, kept verbatim when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    /// Catalog ids this user may see.  Older writers stored the list as a
    /// JSON-encoded string, so decoding is defensive.
    #[serde(default, deserialize_with = "gift_card_list")]
    pub visible_gift_cards: Vec<u64>,
}

fn default_total_spent() -> String {
    "0".to_string()
}

/// Accept a gift-card list either as a JSON array of numbers or as a string
/// containing such an array.  Anything unparseable decodes as empty.
fn gift_card_list<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<u64>),
        Encoded(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::List(ids) => ids,
        Raw::Encoded(s) => serde_json::from_str(&s).unwrap_or_default(),
        Raw::Other(_) => Vec::new(),
    })
}

impl UserRecord {
    /// Dedup key used by the migration merge: lowercased trimmed email,
    /// else trimmed phone, else the id.
    pub fn merge_key(&self) -> String {
        let email = self.email.trim();
        if !email.is_empty() {
            return email.to_lowercase();
        }
        let phone = self.phone.trim();
        if !phone.is_empty() {
            return phone.to_string();
        }
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_camel_case_and_defaults() {
        let json = r#"{
            "id": 1700000000000,
            "name": "Sara",
            "email": "sara@example.com",
            "phone": "",
            "role": "admin",
            "passwordHash": "",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.orders, 0);
        assert!(user.visible_gift_cards.is_empty());
    }

    #[test]
    fn gift_cards_accept_string_encoded_lists() {
        let json = r#"{"id": 1, "visibleGiftCards": "[3,5,8]"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.visible_gift_cards, vec![3, 5, 8]);

        let json = r#"{"id": 1, "visibleGiftCards": "not json"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert!(user.visible_gift_cards.is_empty());

        let json = r#"{"id": 1, "visibleGiftCards": [2, 4]}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.visible_gift_cards, vec![2, 4]);
    }

    #[test]
    fn merge_key_priority_is_email_phone_id() {
        let mut user: UserRecord = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(user.merge_key(), "42");

        user.phone = " 0911 ".to_string();
        assert_eq!(user.merge_key(), "0911");

        user.email = "A@Example.com".to_string();
        assert_eq!(user.merge_key(), "a@example.com");
    }
}
