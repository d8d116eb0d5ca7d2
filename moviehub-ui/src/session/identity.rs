//! Signed-in identity
//!
//! Every identity change (sign-in, sign-out) bumps a session epoch published
//! on a `watch` channel. Anything holding per-identity state subscribes and
//! drops that state when the epoch moves.

use crate::api::ApiClient;
use crate::error::ClientResult;
use moviehub_common::models::Me;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

/// Session epoch counter value
pub type SessionEpoch = u64;

/// Authenticated user
#[derive(Debug, Clone)]
pub struct Identity {
    pub token: String,
    pub profile: Me,
    /// Epoch minted when this identity was signed in
    pub session_epoch: SessionEpoch,
}

/// Identity context consumed by per-identity caches
#[async_trait::async_trait]
pub trait IdentityContext: Send + Sync {
    async fn current(&self) -> Option<Identity>;

    async fn is_authenticated(&self) -> bool {
        self.current().await.is_some()
    }

    /// Receiver observing every identity change
    fn watch_changes(&self) -> watch::Receiver<SessionEpoch>;
}

/// In-process identity holder
pub struct IdentitySession {
    current: RwLock<Option<Identity>>,
    changes: watch::Sender<SessionEpoch>,
}

impl IdentitySession {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            current: RwLock::new(None),
            changes,
        }
    }

    /// Install a new identity, replacing any previous one
    pub async fn sign_in(&self, token: String, profile: Me) -> Identity {
        let mut current = self.current.write().await;
        let epoch = self.bump_epoch();
        let identity = Identity {
            token,
            profile,
            session_epoch: epoch,
        };
        *current = Some(identity.clone());
        info!(user_id = identity.profile.id, username = %identity.profile.username, "Identity signed in");
        identity
    }

    /// Drop the identity; returns whether one was signed in
    pub async fn sign_out(&self) -> bool {
        let mut current = self.current.write().await;
        let was_signed_in = current.take().is_some();
        self.bump_epoch();
        info!(was_signed_in, "Identity signed out");
        was_signed_in
    }

    /// Log in with credentials and load the profile
    pub async fn login(&self, api: &ApiClient, email: &str, password: &str) -> ClientResult<Identity> {
        let token = api.login(email, password).await?;
        let profile = api.me(&token).await?;
        Ok(self.sign_in(token, profile).await)
    }

    /// Resume from a stored token; an unusable token leaves the session signed out
    pub async fn restore(&self, api: &ApiClient, token: &str) -> Option<Me> {
        match api.me(token).await {
            Ok(profile) => {
                self.sign_in(token.to_string(), profile.clone()).await;
                Some(profile)
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected, continuing signed out");
                self.sign_out().await;
                None
            }
        }
    }

    fn bump_epoch(&self) -> SessionEpoch {
        self.changes.send_modify(|epoch| *epoch += 1);
        *self.changes.borrow()
    }
}

impl Default for IdentitySession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityContext for IdentitySession {
    async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    fn watch_changes(&self) -> watch::Receiver<SessionEpoch> {
        self.changes.subscribe()
    }
}
