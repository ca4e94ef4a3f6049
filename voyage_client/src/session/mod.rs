mod events;
mod main;
mod types;

pub use events::SessionEvent;
pub use main::{AuthSession, SessionContext, SessionStore};
pub use types::{AuthResult, SessionSnapshot, UserProfile};
