//! User record as served by the users endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a user record
pub type UserId = i64;

/// A single user as returned by the remote API
///
/// Only `id`, `name`, `email` and `phone` are displayed. The three display
/// fields must be present but may hold any JSON value; they are shown through
/// [`display_text`]. Any other fields the API sends are kept in `extra` so the
/// cached copy matches the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, used to tag the card's delete control
    pub id: UserId,
    /// Display name
    pub name: Value,
    /// Email address, shown verbatim
    pub email: Value,
    /// Phone number, shown verbatim
    pub phone: Value,
    /// Remaining fields of the record, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Creates a user with no extra fields
    pub fn new(
        id: UserId,
        name: impl Into<Value>,
        email: impl Into<Value>,
        phone: impl Into<Value>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            extra: Map::new(),
        }
    }
}

/// Text shown for a display field
///
/// Strings appear without quotes; any other value appears as its JSON text,
/// so `null` reads "null" and `5551234` reads "5551234".
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let json = r#"{
            "id": 3,
            "name": "Clementine Bauch",
            "username": "Samantha",
            "email": "Nathan@yesenia.net",
            "phone": "1-463-123-4447",
            "address": { "city": "McKenziehaven" }
        }"#;

        let user: User = serde_json::from_str(json).expect("Should parse user");

        assert_eq!(user.id, 3);
        assert_eq!(user.name, "Clementine Bauch");
        assert_eq!(user.extra.get("username"), Some(&Value::from("Samantha")));
        assert!(user.extra.contains_key("address"));

        let back = serde_json::to_value(&user).expect("Should serialize user");
        assert_eq!(back["address"]["city"], "McKenziehaven");
        assert_eq!(back["phone"], "1-463-123-4447");
    }

    #[test]
    fn test_user_missing_display_field_is_rejected() {
        let json = r#"{ "id": 1, "name": "Ann", "email": "a@x.com" }"#;
        let result: Result<User, _> = serde_json::from_str(json);
        assert!(result.is_err(), "display fields must be present");
    }

    #[test]
    fn test_user_accepts_non_string_display_fields() {
        let json = r#"{ "id": 1, "name": "Ann", "email": null, "phone": 5551234 }"#;

        let user: User = serde_json::from_str(json).expect("Any JSON value is accepted");

        assert_eq!(user.email, Value::Null);
        assert_eq!(user.phone, Value::from(5551234));

        let back = serde_json::to_value(&user).expect("Should serialize user");
        assert_eq!(back["email"], Value::Null);
        assert_eq!(back["phone"], 5551234);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&Value::from("a@x.com")), "a@x.com");
        assert_eq!(display_text(&Value::from(5551234)), "5551234");
        assert_eq!(display_text(&Value::Null), "null");
        assert_eq!(display_text(&Value::from(true)), "true");
        assert_eq!(
            display_text(&serde_json::json!({"ext": "12"})),
            r#"{"ext":"12"}"#
        );
    }

    #[test]
    fn test_user_new_has_no_extra_fields() {
        let user = User::new(1, "Ann", "a@x.com", "555");
        assert!(user.extra.is_empty());
        assert_eq!(user.email, "a@x.com");
    }
}
