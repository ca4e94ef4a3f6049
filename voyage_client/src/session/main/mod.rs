mod context;
mod normalize;
mod store;

pub use context::SessionContext;
pub use store::{AuthSession, SessionStore};
