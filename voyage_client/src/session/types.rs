use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Normalized profile of the signed-in user.
///
/// Backend records may use either the API's PascalCase names (`User_ID`, `Name`,
/// `Phone_Number`, `Created_At`, ...) or camelCase names; see [`UserProfile::normalize`].
/// Serialization emits both conventions so consumers written against either keep working.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Account creation timestamp as sent by the backend, or the normalization time
    pub join_date: String,
    pub profile_image: Option<String>,
    pub reviews: Vec<Value>,
}

impl Serialize for UserProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(13))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("email", &self.email)?;
        map.serialize_entry("phone", &self.phone)?;
        map.serialize_entry("address", &self.address)?;
        map.serialize_entry("User_ID", &self.id)?;
        map.serialize_entry("Name", &self.name)?;
        map.serialize_entry("Email", &self.email)?;
        map.serialize_entry("Phone_Number", &self.phone)?;
        map.serialize_entry("Address", &self.address)?;
        map.serialize_entry("joinDate", &self.join_date)?;
        map.serialize_entry("profileImage", &self.profile_image)?;
        map.serialize_entry("reviews", &self.reviews)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::normalize(&raw)
            .ok_or_else(|| serde::de::Error::custom("user record must be a JSON object"))
    }
}

/// Outcome of `login`/`register`. Serializes as `{"success": true}` or
/// `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Success,
    Failure { message: String },
}

impl AuthResult {
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Failure message, `None` on success
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message } => Some(message),
        }
    }
}

impl Serialize for AuthResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("success", &true)?;
                map.end()
            }
            Self::Failure { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

/// Point-in-time copy of the session fields a view renders from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub user: Option<UserProfile>,
    pub loading: bool,
}
