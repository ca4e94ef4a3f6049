use serde::Serialize;

/// Session transitions the host UI reacts to, typically by navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// The backend answered 401; token and user have been evicted.
    Expired,
    /// `logout` was called.
    LoggedOut,
}

impl SessionEvent {
    /// Route the host is expected to show after this event
    pub fn redirect_path(&self) -> &'static str {
        match self {
            Self::Expired => "/login",
            Self::LoggedOut => "/",
        }
    }
}
