//! Client wiring: one API client shared by the session, label cache and
//! view coordinator

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::{Identity, IdentityContext, IdentitySession, LabelCache};
use crate::view::ViewSyncCoordinator;
use moviehub_common::config::ClientConfig;
use moviehub_common::events::EventBus;
use moviehub_common::models::{Me, UserId};
use std::sync::Arc;

/// Shared client state handed to presentation adapters
#[derive(Clone)]
pub struct MovieHub {
    pub api: Arc<ApiClient>,
    pub session: Arc<IdentitySession>,
    pub labels: Arc<LabelCache>,
    pub coordinator: ViewSyncCoordinator,
    pub event_bus: EventBus,
}

impl MovieHub {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::new(&config.api_base_url, config.request_timeout)?);
        Ok(Self::with_api(api, EventBus::new(config.event_capacity)))
    }

    pub fn with_api(api: Arc<ApiClient>, event_bus: EventBus) -> Self {
        let session = Arc::new(IdentitySession::new());
        let identity: Arc<dyn IdentityContext> = session.clone();
        let labels = Arc::new(LabelCache::new(identity, api.clone()));
        let coordinator = ViewSyncCoordinator::new(api.clone(), api.clone(), api.clone(), event_bus.clone());

        Self {
            api,
            session,
            labels,
            coordinator,
            event_bus,
        }
    }

    /// Resume a stored session if a token is configured
    pub async fn restore(&self, token: Option<&str>) -> Option<Me> {
        match token {
            Some(token) => self.session.restore(&self.api, token).await,
            None => None,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Identity> {
        self.session.login(&self.api, email, password).await
    }

    pub async fn sign_out(&self) {
        self.session.sign_out().await;
    }

    /// Reviewer label for presentation
    pub async fn resolve_label(&self, user_id: UserId) -> String {
        self.labels.resolve(user_id).await
    }
}
