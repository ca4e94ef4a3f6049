use chrono::Utc;
use serde_json::{Map, Value};

use crate::session::types::UserProfile;

impl UserProfile {
    /// Map a backend user record onto the canonical profile.
    ///
    /// Each field is taken from the first non-empty candidate key, PascalCase first.
    /// Missing text fields become empty strings and a missing join date becomes the
    /// current time. The profile image and review list always start out unset and empty,
    /// whatever the backend sent. Returns `None` unless `raw` is a JSON object.
    ///
    /// The mapping is idempotent: normalizing the serialized output yields the same profile.
    pub fn normalize(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;

        Some(Self {
            id: first_text(record, &["User_ID", "id"]).unwrap_or_default(),
            name: first_text(record, &["Name", "name"]).unwrap_or_default(),
            email: first_text(record, &["Email", "email"]).unwrap_or_default(),
            phone: first_text(record, &["Phone_Number", "phone"]).unwrap_or_default(),
            address: first_text(record, &["Address", "address"]).unwrap_or_default(),
            join_date: first_text(record, &["Created_At", "joinDate"])
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            profile_image: None,
            reviews: Vec::new(),
        })
    }
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Identifiers are frequently numeric in the backend
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
