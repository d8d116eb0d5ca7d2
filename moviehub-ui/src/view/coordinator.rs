//! Two-phase detail view loading
//!
//! `select` fetches the movie and renders it at once with no trailer, then
//! the trailer enrichment and the review list arrive on spawned tasks. Every
//! selection gets a fresh generation; a spawned task applies its result only
//! if its generation is still the visible one, so a late answer for an
//! earlier selection can never overwrite a later one. At most one load of
//! each kind is in flight per generation.

use super::state::{Selection, ViewPhase, ViewState};
use crate::error::ClientError;
use crate::media::{resolve_trailer, MediaReference, Trailer};
use crate::ports::{EntitySource, MetadataSource, ReviewSource};
use chrono::Utc;
use moviehub_common::events::{EventBus, Generation, Readiness, ViewEvent};
use moviehub_common::models::{Movie, MovieId, TmdbId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Result of a `select` call that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The movie is now on screen
    Shown(Movie),
    /// A later `select` took over before this one finished
    Superseded,
}

/// Background load issued for a shown movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Load {
    Trailer(TmdbId),
    Reviews,
}

struct ViewStore {
    view: ViewState,
    /// Last non-loading view, restored when the authoritative load fails
    fallback: Option<ViewState>,
    in_flight: HashSet<(Generation, Load)>,
}

impl ViewStore {
    /// Loads the current view still waits for and nobody is running yet
    fn claim_outstanding(&mut self) -> Vec<(Selection, Load)> {
        let Some(selection) = self.view.selection else {
            return Vec::new();
        };
        let Some(movie) = &self.view.movie else {
            return Vec::new();
        };

        let mut needed = Vec::new();
        if self.view.phase == ViewPhase::Ready(Readiness::StalePending) {
            if let Some(tmdb_id) = movie.external_metadata_id() {
                needed.push(Load::Trailer(tmdb_id));
            }
        }
        if self.view.reviews.is_none() {
            needed.push(Load::Reviews);
        }

        needed
            .into_iter()
            .filter(|load| self.in_flight.insert((selection.generation, *load)))
            .map(|load| (selection, load))
            .collect()
    }

    /// Mark a load finished; true when its result may still be applied
    fn finish(&mut self, generation: Generation, load: Load) -> bool {
        self.in_flight.remove(&(generation, load));
        self.view.is_current(generation)
    }
}

struct Inner {
    entities: Arc<dyn EntitySource>,
    metadata: Arc<dyn MetadataSource>,
    reviews: Arc<dyn ReviewSource>,
    store: RwLock<ViewStore>,
    event_bus: EventBus,
    last_generation: AtomicU64,
}

/// Keeps the detail view consistent with the latest selection
#[derive(Clone)]
pub struct ViewSyncCoordinator {
    inner: Arc<Inner>,
}

impl ViewSyncCoordinator {
    pub fn new(
        entities: Arc<dyn EntitySource>,
        metadata: Arc<dyn MetadataSource>,
        reviews: Arc<dyn ReviewSource>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                entities,
                metadata,
                reviews,
                store: RwLock::new(ViewStore {
                    view: ViewState::default(),
                    fallback: None,
                    in_flight: HashSet::new(),
                }),
                event_bus,
                last_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Show a movie
    ///
    /// Returns once the movie itself is rendered; the trailer and reviews
    /// follow as [`ViewEvent`]s. On failure the previous view is restored
    /// and the error is returned.
    pub async fn select(&self, movie_id: MovieId) -> Result<SelectOutcome, ClientError> {
        let inner = &self.inner;
        let generation = inner.last_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let selection = Selection {
            movie_id,
            generation,
        };

        {
            let mut store = inner.store.write().await;
            if store.view.phase != ViewPhase::Loading {
                store.fallback = Some(store.view.clone());
            }
            store.view.selection = Some(selection);
            store.view.phase = ViewPhase::Loading;
        }
        debug!(movie_id, generation, "Selection started");
        inner.event_bus.emit_lossy(ViewEvent::SelectionStarted {
            generation,
            movie_id,
            timestamp: Utc::now(),
        });

        match inner.entities.fetch_movie(movie_id).await {
            Ok(movie) => {
                let (view, loads) = {
                    let mut store = inner.store.write().await;
                    if !store.view.is_current(generation) {
                        debug!(movie_id, generation, "Movie arrived for a superseded selection, discarded");
                        return Ok(SelectOutcome::Superseded);
                    }
                    store.fallback = None;
                    store.view = ViewState::shown(selection, movie.clone());
                    (store.view.clone(), store.claim_outstanding())
                };

                info!(movie_id, generation, title = %movie.title, "Movie rendered");
                self.emit_rendered(&view);
                self.spawn_loads(loads);
                Ok(SelectOutcome::Shown(movie))
            }
            Err(e) => {
                let resumed = {
                    let mut store = inner.store.write().await;
                    if store.view.is_current(generation) {
                        store.view = store.fallback.take().unwrap_or_default();
                        Some(store.claim_outstanding())
                    } else {
                        None
                    }
                };

                warn!(movie_id, generation, error = %e, "Movie load failed");
                if let Some(loads) = resumed {
                    inner.event_bus.emit_lossy(ViewEvent::SelectionFailed {
                        generation,
                        movie_id,
                        message: e.user_message(),
                        timestamp: Utc::now(),
                    });
                    self.spawn_loads(loads);
                }
                Err(e)
            }
        }
    }

    /// Trailer reference currently on screen
    pub async fn current_media_reference(&self) -> MediaReference {
        self.inner.store.read().await.view.trailer.reference.clone()
    }

    pub async fn current_trailer(&self) -> Trailer {
        self.inner.store.read().await.view.trailer.clone()
    }

    /// Copy of the whole view
    pub async fn snapshot(&self) -> ViewState {
        self.inner.store.read().await.view.clone()
    }

    /// Change notifications, one per rendered transition
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.inner.event_bus.subscribe()
    }

    fn emit_rendered(&self, view: &ViewState) {
        if let (Some(selection), ViewPhase::Ready(readiness)) = (view.selection, view.phase) {
            self.inner.event_bus.emit_lossy(ViewEvent::MovieRendered {
                generation: selection.generation,
                movie_id: selection.movie_id,
                readiness,
                timestamp: Utc::now(),
            });
        }
    }

    fn spawn_loads(&self, loads: Vec<(Selection, Load)>) {
        for (selection, load) in loads {
            match load {
                Load::Trailer(tmdb_id) => self.spawn_enrichment(selection, tmdb_id),
                Load::Reviews => self.spawn_reviews(selection),
            }
        }
    }

    fn spawn_enrichment(&self, selection: Selection, tmdb_id: TmdbId) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let trailer = match coordinator.inner.metadata.fetch_trailer(tmdb_id).await {
                Ok(payload) => resolve_trailer(&payload),
                Err(e) => {
                    debug!(tmdb_id, generation = selection.generation, error = %e, "Trailer enrichment failed");
                    Trailer::none()
                }
            };
            coordinator.apply_trailer(selection.generation, tmdb_id, trailer).await;
        });
    }

    async fn apply_trailer(&self, generation: Generation, tmdb_id: TmdbId, trailer: Trailer) {
        let view = {
            let mut store = self.inner.store.write().await;
            if !store.finish(generation, Load::Trailer(tmdb_id)) {
                debug!(generation, "Stale trailer enrichment discarded");
                return;
            }
            store.view.trailer = trailer;
            store.view.phase = ViewPhase::Ready(Readiness::Settled);
            store.view.clone()
        };

        debug!(
            generation,
            resolved = view.trailer.reference.is_resolved(),
            "Trailer settled"
        );
        self.emit_rendered(&view);
    }

    fn spawn_reviews(&self, selection: Selection) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let reviews = match coordinator.inner.reviews.fetch_reviews(selection.movie_id).await {
                Ok(reviews) => reviews,
                Err(e) => {
                    debug!(movie_id = selection.movie_id, error = %e, "Review load failed, showing none");
                    Vec::new()
                }
            };

            let count = reviews.len();
            {
                let mut store = coordinator.inner.store.write().await;
                if !store.finish(selection.generation, Load::Reviews) {
                    debug!(generation = selection.generation, "Stale reviews discarded");
                    return;
                }
                store.view.reviews = Some(reviews);
            }

            coordinator.inner.event_bus.emit_lossy(ViewEvent::ReviewsLoaded {
                generation: selection.generation,
                movie_id: selection.movie_id,
                count,
                timestamp: Utc::now(),
            });
        });
    }
}
