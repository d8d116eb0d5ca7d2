//! Read-through cache of reviewer display labels
//!
//! At most one successful lookup per user per identity. Failures are never
//! cached so transient errors and late permission grants heal on the next
//! call. Any identity change empties the cache.

use super::identity::{IdentityContext, SessionEpoch};
use crate::ports::SubjectDirectory;
use moviehub_common::models::{UserId, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::debug;

/// Label shown when no better one is available
pub fn placeholder_label(user_id: UserId) -> String {
    format!("user:{user_id}")
}

fn profile_label(profile: &UserProfile, user_id: UserId) -> String {
    let username = profile.username.trim();
    if username.is_empty() {
        placeholder_label(user_id)
    } else {
        format!("{username} (id:{})", profile.id)
    }
}

struct CacheState {
    labels: HashMap<UserId, String>,
    changes: watch::Receiver<SessionEpoch>,
    epoch: SessionEpoch,
}

impl CacheState {
    /// Catch up with identity changes, clearing on any epoch move
    fn sync_identity(&mut self) {
        let latest = *self.changes.borrow_and_update();
        if latest != self.epoch {
            if !self.labels.is_empty() {
                debug!(entries = self.labels.len(), "Identity changed, clearing label cache");
            }
            self.labels.clear();
            self.epoch = latest;
        }
    }
}

/// Memoizing user-label lookup
pub struct LabelCache {
    identity: Arc<dyn IdentityContext>,
    directory: Arc<dyn SubjectDirectory>,
    state: Mutex<CacheState>,
}

impl LabelCache {
    pub fn new(identity: Arc<dyn IdentityContext>, directory: Arc<dyn SubjectDirectory>) -> Self {
        let mut changes = identity.watch_changes();
        let epoch = *changes.borrow_and_update();
        Self {
            identity,
            directory,
            state: Mutex::new(CacheState {
                labels: HashMap::new(),
                changes,
                epoch,
            }),
        }
    }

    /// Display label for a user; never fails
    pub async fn resolve(&self, user_id: UserId) -> String {
        let Some(identity) = self.identity.current().await else {
            return placeholder_label(user_id);
        };

        {
            let mut state = self.state.lock().await;
            state.sync_identity();
            if state.epoch != identity.session_epoch {
                // Identity changed between the two reads
                return placeholder_label(user_id);
            }
            if let Some(label) = state.labels.get(&user_id) {
                return label.clone();
            }
        }

        match self.directory.fetch_user(&identity.token, user_id).await {
            Ok(profile) => {
                let label = profile_label(&profile, user_id);
                let mut state = self.state.lock().await;
                state.sync_identity();
                if state.epoch == identity.session_epoch {
                    state.labels.insert(user_id, label.clone());
                } else {
                    debug!(user_id, "Identity changed during lookup, label not cached");
                }
                label
            }
            Err(e) => {
                debug!(user_id, error = %e, "User label lookup failed");
                placeholder_label(user_id)
            }
        }
    }

    /// Drop every cached label
    pub async fn invalidate_all(&self) {
        self.state.lock().await.labels.clear();
    }
}
