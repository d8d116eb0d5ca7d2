//! View events and EventBus for MovieHub clients
//!
//! Presentation adapters subscribe to the bus and re-render from the
//! coordinator snapshot whenever a [`ViewEvent`] arrives.

use crate::models::MovieId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Selection generation counter value
pub type Generation = u64;

/// How far a ready view has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Movie shown, enrichment still outstanding
    StalePending,
    /// Enrichment applied (or not needed)
    Settled,
}

/// View change notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewEvent {
    /// A new selection started loading
    SelectionStarted {
        generation: Generation,
        movie_id: MovieId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The detail view was (re)rendered
    MovieRendered {
        generation: Generation,
        movie_id: MovieId,
        readiness: Readiness,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Reviews for the active selection were applied
    ReviewsLoaded {
        generation: Generation,
        movie_id: MovieId,
        count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The authoritative load failed; the previous view is back
    SelectionFailed {
        generation: Generation,
        movie_id: MovieId,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ViewEvent {
    /// Event type name
    pub fn event_type(&self) -> &str {
        match self {
            ViewEvent::SelectionStarted { .. } => "SelectionStarted",
            ViewEvent::MovieRendered { .. } => "MovieRendered",
            ViewEvent::ReviewsLoaded { .. } => "ReviewsLoaded",
            ViewEvent::SelectionFailed { .. } => "SelectionFailed",
        }
    }

    /// Generation the event was minted under
    pub fn generation(&self) -> Generation {
        match self {
            ViewEvent::SelectionStarted { generation, .. }
            | ViewEvent::MovieRendered { generation, .. }
            | ViewEvent::ReviewsLoaded { generation, .. }
            | ViewEvent::SelectionFailed { generation, .. } => *generation,
        }
    }
}

/// Central distribution bus for view events
///
/// Uses tokio::broadcast internally: publishing never blocks, slow
/// subscribers observe `Lagged` instead of stalling the producer.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ViewEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ViewEvent) {
        let _ = self.tx.send(event);
    }
}
