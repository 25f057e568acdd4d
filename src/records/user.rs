use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of an auth collection such as `users`.
///
/// This is a snapshot of the server state at fetch time. Fetch it again to
/// observe changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// The user's unique ID.
    pub id: String,
    /// The ID of the collection the user belongs to.
    pub collection_id: String,
    /// The name of the collection the user belongs to.
    pub collection_name: String,
    /// The user's username.
    pub username: String,
    /// Indicates whether the user's email has been verified.
    pub verified: bool,
    /// Indicates whether the user's email is publicly visible.
    pub email_visibility: bool,
    /// The user's email address.
    ///
    /// Empty when the server hides it (`email_visibility` off and the caller
    /// isn't the owner).
    #[serde(default)]
    pub email: String,
    /// The timestamp when the record was created.
    pub created: String,
    /// The timestamp when the record was last updated.
    pub updated: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Avatar file name.
    #[serde(default)]
    pub avatar: String,
    /// Role of the user.
    #[serde(default)]
    pub role: String,
}

impl UserRecord {
    /// Parses [`UserRecord::created`].
    pub fn created_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        parse_timestamp(&self.created)
    }

    /// Parses [`UserRecord::updated`].
    pub fn updated_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        parse_timestamp(&self.updated)
    }
}

/// Parses the `PocketBase` datetime format (`2022-01-01 10:00:00.123Z`), with
/// RFC 3339 as a fallback.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.fZ")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|date| date.with_timezone(&Utc)))
}

/// Payload used to create a user.
///
/// # Example
/// ```rust
/// use pocketbase_users::PreparedUser;
///
/// let user = PreparedUser {
///     username: "ann".to_string(),
///     email: "ann@example.com".to_string(),
///     password: "12345678".to_string(),
///     password_confirm: "12345678".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedUser {
    /// Username.
    pub username: String,
    /// Plain password.
    pub password: String,
    /// Must match `password`.
    pub password_confirm: String,
    /// Email address.
    pub email: String,
    /// Whether the email is publicly visible.
    pub email_visibility: bool,
    /// Only superusers may set this.
    pub verified: bool,
    /// Display name.
    pub name: String,
}

/// Payload used to partially update a user.
///
/// Fields left to `None` are not sent, so the server keeps their current
/// value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedUserUpdate {
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New password. Non-superusers must also send `old_password`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Must match `password`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirm: Option<String>,
    /// Current password, required to change it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    /// New email (superusers only, others go through the email change flow).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email is publicly visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_visibility: Option<bool>,
    /// Verified flag (superusers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;
    use crate::RecordList;

    fn user_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "collectionId": "_pb_users_auth_",
            "collectionName": "users",
            "username": format!("user_{id}"),
            "verified": true,
            "emailVisibility": false,
            "email": format!("{id}@example.com"),
            "created": "2022-01-01 10:00:00.123Z",
            "updated": "2022-01-02 10:00:00.123Z",
            "name": "Ann",
            "avatar": "ann.png",
            "role": "admin",
            "someCustomField": 42
        })
    }

    #[test]
    fn decodes_user_and_ignores_unknown_keys() {
        let user: UserRecord = serde_json::from_value(user_json("abc")).unwrap();
        assert_eq!(user.id, "abc");
        assert_eq!(user.collection_name, "users");
        assert_eq!(user.username, "user_abc");
        assert!(user.verified);
        assert!(!user.email_visibility);
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn missing_required_field_fails() {
        let mut value = user_json("abc");
        value.as_object_mut().unwrap().remove("verified");
        assert!(serde_json::from_value::<UserRecord>(value).is_err());
    }

    #[test]
    fn wrong_type_fails() {
        let mut value = user_json("abc");
        value["verified"] = json!("yes");
        assert!(serde_json::from_value::<UserRecord>(value).is_err());
    }

    #[test]
    fn hidden_email_defaults_to_empty() {
        let mut value = user_json("abc");
        value.as_object_mut().unwrap().remove("email");
        let user: UserRecord = serde_json::from_value(value).unwrap();
        assert_eq!(user.email, "");
    }

    #[test]
    fn parses_pocketbase_timestamps() {
        let user: UserRecord = serde_json::from_value(user_json("abc")).unwrap();
        let created = user.created_at().unwrap();
        assert_eq!(created.year(), 2022);
        assert_eq!(created.hour(), 10);
        assert_eq!(user.updated_at().unwrap().day(), 2);

        assert!(parse_timestamp("2024-05-01T08:30:00Z").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn decodes_record_list() {
        let items: Vec<serde_json::Value> = (0..3).map(|i| user_json(&i.to_string())).collect();
        let list: RecordList<UserRecord> = serde_json::from_value(json!({
            "page": 1,
            "perPage": 2,
            "totalItems": 3,
            "totalPages": 2,
            "items": items
        }))
        .unwrap();

        assert_eq!(list.items.len(), 3);
        assert_eq!(list.totals(), Some((3, 2)));
        assert_eq!(list.items[2].id, "2");
    }

    #[test]
    fn skipped_totals_are_not_reported() {
        let list: RecordList<UserRecord> = serde_json::from_value(json!({
            "page": 1,
            "perPage": 30,
            "totalItems": -1,
            "totalPages": -1,
            "items": []
        }))
        .unwrap();

        assert_eq!(list.totals(), None);
    }

    #[test]
    fn partial_update_omits_unset_fields() {
        let update = PreparedUserUpdate {
            name: Some("Bob".to_string()),
            verified: Some(false),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "name": "Bob", "verified": false })
        );
    }

    #[test]
    fn prepared_user_uses_camel_case() {
        let user = PreparedUser {
            username: "ann".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            email: "ann@example.com".to_string(),
            email_visibility: true,
            verified: false,
            name: "Ann".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "username": "ann",
                "password": "secret123",
                "passwordConfirm": "secret123",
                "email": "ann@example.com",
                "emailVisibility": true,
                "verified": false,
                "name": "Ann"
            })
        );
    }
}
