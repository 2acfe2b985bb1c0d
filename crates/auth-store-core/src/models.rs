// Record models for the two tables the adapter owns.
//
// Timestamps are canonically `i64` (milliseconds or whatever unit the calling
// library uses — the adapter only guarantees lossless round-trip up to
// i64::MAX). Extension columns on `user` ride along in a flattened map the
// core never inspects.

use serde::{Deserialize, Serialize};

/// A row of the `user` table.
///
/// `attributes` carries caller-defined extension columns verbatim; the core
/// only depends on the three fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub provider_id: String,
    /// Absent for users authenticated only via external providers.
    pub hashed_password: Option<String>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        hashed_password: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            hashed_password,
            attributes: serde_json::Map::new(),
        }
    }

    /// Attach an extension attribute (builder style).
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A row of the `session` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    /// References `user.id`; enforced by the backend's foreign key.
    pub user_id: String,
    /// Absolute expiry, canonical i64.
    pub expires: i64,
    /// Idle-timeout boundary, canonical i64.
    pub idle_expires: i64,
}

impl SessionRecord {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        expires: i64,
        idle_expires: i64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            expires,
            idle_expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serde_flattens_attributes() {
        let user = UserRecord::new("u1", "email:a@b.com", Some("h1".into()))
            .with_attribute("username", "alice");

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["provider_id"], "email:a@b.com");
        assert_eq!(json["hashed_password"], "h1");
        // Extension attribute sits at the top level, not nested.
        assert_eq!(json["username"], "alice");

        let back: UserRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn user_null_password_round_trips() {
        let user = UserRecord::new("u2", "github:42", None);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json["hashed_password"].is_null());
        let back: UserRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.hashed_password, None);
    }

    #[test]
    fn session_timestamps_keep_i64_precision() {
        let session = SessionRecord::new("s1", "u1", 9_223_372_036_854_775_000, 500);
        let json = serde_json::to_value(&session).unwrap();
        let back: SessionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.expires, 9_223_372_036_854_775_000);
        assert_eq!(back, session);
    }
}
