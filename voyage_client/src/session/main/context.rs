use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::session::events::SessionEvent;
use crate::session::types::{SessionSnapshot, UserProfile};
use crate::storage::{StorageError, TokenStore};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Shared session state: the persisted token, the in-memory user and the event channel.
///
/// Cloning is cheap and every clone refers to the same session. The gateway holds one to
/// read credentials and evict on 401; the session store holds one to run sign-in flows.
///
/// Token and user are only ever mutated together under the state write lock, and every
/// mutation bumps a generation counter. Work that started under an older generation
/// (an in-flight request, a profile refresh) is discarded instead of applied.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token_store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

#[derive(Debug)]
struct SessionState {
    user: Option<UserProfile>,
    loading: bool,
    generation: u64,
    // Set when an eviction could not clear the token store; the persisted token is
    // ignored until the next sign-in replaces it
    token_revoked: bool,
}

impl SessionContext {
    pub fn new(token_store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                token_store,
                state: RwLock::new(SessionState {
                    user: None,
                    loading: true,
                    generation: 0,
                    token_revoked: false,
                }),
                events,
            }),
        }
    }

    /// Subscribe to session expiry and logout notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.inner.state.read().await.user.clone()
    }

    /// True until the startup hydration attempt has resolved
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.user.is_some()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read().await;
        SessionSnapshot {
            user: state.user.clone(),
            loading: state.loading,
        }
    }

    /// Counter bumped by every sign-in, logout and eviction
    pub async fn generation(&self) -> u64 {
        self.inner.state.read().await.generation
    }

    /// Read the persisted token together with the generation it belongs to.
    ///
    /// A token store failure is logged and treated as "no token".
    pub(crate) async fn credentials(&self) -> (Option<String>, u64) {
        let state = self.inner.state.read().await;
        if state.token_revoked {
            return (None, state.generation);
        }
        let token = match self.inner.token_store.get().await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::error!("Failed to read persisted token: {}", e);
                None
            }
        };
        (token, state.generation)
    }

    /// Evict token and user after the backend rejected credentials read at `observed`.
    ///
    /// Returns false, leaving the session untouched, when a newer sign-in or logout has
    /// happened since.
    pub(crate) async fn expire(&self, observed: u64) -> bool {
        {
            let mut state = self.inner.state.write().await;
            if state.generation != observed {
                tracing::debug!(
                    "Ignoring stale 401: request generation {}, current {}",
                    observed,
                    state.generation
                );
                return false;
            }

            self.clear_token(&mut state).await;
            state.user = None;
            state.generation += 1;
        }

        tracing::warn!("Session expired; token evicted");
        self.publish(SessionEvent::Expired);
        true
    }

    /// Persist a fresh token and store the optimistic user. Returns the new generation.
    pub(crate) async fn sign_in(
        &self,
        token: &str,
        user: UserProfile,
    ) -> Result<u64, StorageError> {
        let mut state = self.inner.state.write().await;
        self.inner.token_store.set(token).await?;
        state.token_revoked = false;
        state.user = Some(user);
        state.generation += 1;
        Ok(state.generation)
    }

    /// Replace the user with a refreshed profile if nothing changed since `observed`.
    pub(crate) async fn apply_profile(&self, observed: u64, user: UserProfile) -> bool {
        let mut state = self.inner.state.write().await;
        if state.generation != observed {
            tracing::debug!("Discarding profile refreshed under stale generation {}", observed);
            return false;
        }
        state.user = Some(user);
        true
    }

    /// Drop a persisted token that failed validation, if nothing changed since `observed`.
    pub(crate) async fn discard_token(&self, observed: u64) {
        let mut state = self.inner.state.write().await;
        if state.generation != observed {
            return;
        }
        self.clear_token(&mut state).await;
        state.user = None;
        state.generation += 1;
    }

    pub(crate) async fn sign_out(&self) {
        {
            let mut state = self.inner.state.write().await;
            self.clear_token(&mut state).await;
            state.user = None;
            state.generation += 1;
        }
        self.publish(SessionEvent::LoggedOut);
    }

    pub(crate) async fn finish_loading(&self) {
        self.inner.state.write().await.loading = false;
    }

    /// Remove the persisted token. If the store refuses, the token is still treated as
    /// gone for this process.
    async fn clear_token(&self, state: &mut SessionState) {
        match self.inner.token_store.clear().await {
            Ok(()) => state.token_revoked = false,
            Err(e) => {
                tracing::error!("Failed to clear persisted token: {}", e);
                state.token_revoked = true;
            }
        }
    }

    fn publish(&self, event: SessionEvent) {
        if self.inner.events.send(event).is_err() {
            tracing::debug!("No subscribers for session event {:?}", event);
        }
    }
}
