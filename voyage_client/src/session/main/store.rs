use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::gateway::{ApiGateway, GatewayError};
use crate::session::events::SessionEvent;
use crate::session::types::{AuthResult, SessionSnapshot, UserProfile};

use super::context::SessionContext;

/// What the rest of the application needs from the session: who is signed in and the
/// transitions that change it.
#[async_trait]
pub trait AuthSession: Send + Sync {
    async fn get_user(&self) -> Option<UserProfile>;

    async fn hydrate(&self);

    async fn login(&self, email: &str, password: &str) -> AuthResult;

    async fn register(&self, user_data: &Value) -> AuthResult;

    async fn logout(&self);
}

/// Authenticated-user lifecycle on top of the gateway.
///
/// Construct one at the composition root and hand clones to whatever needs the session;
/// all clones share state.
#[derive(Clone)]
pub struct SessionStore {
    gateway: ApiGateway,
}

impl SessionStore {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn context(&self) -> &SessionContext {
        self.gateway.session()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.context().subscribe()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.context().user().await
    }

    pub async fn is_loading(&self) -> bool {
        self.context().is_loading().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.context().snapshot().await
    }

    /// Restore the session from a persisted token at startup.
    ///
    /// Without a token this only clears `loading`. With one, the profile is fetched;
    /// any failure discards the token. Errors are logged, never returned, and `loading`
    /// is always false afterwards.
    pub async fn hydrate(&self) {
        let context = self.context();
        let (token, generation) = context.credentials().await;

        if token.is_none() {
            tracing::debug!("No persisted token; starting signed out");
            context.finish_loading().await;
            return;
        }

        match self.fetch_profile().await {
            Ok(Some(user)) => {
                tracing::debug!("Session restored for user {}", user.id);
                context.apply_profile(generation, user).await;
            }
            Ok(None) => {
                tracing::warn!("Persisted token did not yield a profile; discarding it");
                context.discard_token(generation).await;
            }
            Err(e) => {
                tracing::error!("Error fetching user profile: {}", e);
                context.discard_token(generation).await;
            }
        }

        context.finish_loading().await;
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let response = self.gateway.login(email, password).await;
        self.complete_sign_in(response, "Login failed").await
    }

    pub async fn register<T: Serialize + ?Sized>(&self, user_data: &T) -> AuthResult {
        let response = self.gateway.register(user_data).await;
        self.complete_sign_in(response, "Registration failed").await
    }

    /// Clear token and user, then publish [`SessionEvent::LoggedOut`].
    ///
    /// Safe to call without an active session; the event is still published.
    pub async fn logout(&self) {
        tracing::debug!("Logging out");
        self.context().sign_out().await;
    }

    /// Store the optimistic user from a login/register response, then refresh the full
    /// profile. A failed refresh is logged and the optimistic user kept.
    async fn complete_sign_in(
        &self,
        response: Result<Option<Value>, GatewayError>,
        fallback: &str,
    ) -> AuthResult {
        let data = match response {
            Ok(Some(data)) => data,
            Ok(None) => return AuthResult::failure(fallback),
            Err(e) => {
                tracing::debug!("{}: {}", fallback, e);
                return AuthResult::failure(e.message());
            }
        };

        let Some((token, user)) = sign_in_payload(&data) else {
            tracing::warn!("{}: response lacks a token or user", fallback);
            return AuthResult::failure(fallback);
        };

        let generation = match self.context().sign_in(&token, user).await {
            Ok(generation) => generation,
            Err(e) => {
                tracing::error!("Failed to persist token: {}", e);
                return AuthResult::failure(fallback);
            }
        };

        match self.fetch_profile().await {
            Ok(Some(user)) => {
                self.context().apply_profile(generation, user).await;
            }
            Ok(None) => {
                tracing::debug!("Profile refresh returned no user; keeping sign-in response");
            }
            Err(e) => {
                tracing::error!("Error fetching full profile after sign-in: {}", e);
            }
        }

        AuthResult::Success
    }

    async fn fetch_profile(&self) -> Result<Option<UserProfile>, GatewayError> {
        let Some(data) = self.gateway.current_user().await? else {
            return Ok(None);
        };
        Ok(data.get("user").and_then(UserProfile::normalize))
    }
}

fn sign_in_payload(data: &Value) -> Option<(String, UserProfile)> {
    let token = data.get("token")?.as_str().filter(|t| !t.is_empty())?;
    let user = UserProfile::normalize(data.get("user")?)?;
    Some((token.to_string(), user))
}

#[async_trait]
impl AuthSession for SessionStore {
    async fn get_user(&self) -> Option<UserProfile> {
        self.user().await
    }

    async fn hydrate(&self) {
        SessionStore::hydrate(self).await
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult {
        SessionStore::login(self, email, password).await
    }

    async fn register(&self, user_data: &Value) -> AuthResult {
        SessionStore::register(self, user_data).await
    }

    async fn logout(&self) {
        SessionStore::logout(self).await
    }
}
