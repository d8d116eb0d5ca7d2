//! Detail view state

use crate::media::{MediaReference, Trailer};
use moviehub_common::events::{Generation, Readiness};
use moviehub_common::models::{Movie, MovieId, Review};

/// Which movie the user most recently asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub movie_id: MovieId,
    pub generation: Generation,
}

/// Detail view lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Ready(Readiness),
}

/// Everything a presentation adapter renders for the detail view
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selection: Option<Selection>,
    pub phase: ViewPhase,
    pub movie: Option<Movie>,
    pub trailer: Trailer,
    /// `None` while the review load is outstanding
    pub reviews: Option<Vec<Review>>,
}

impl ViewState {
    pub fn generation(&self) -> Option<Generation> {
        self.selection.map(|s| s.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation() == Some(generation)
    }

    pub fn media_reference(&self) -> &MediaReference {
        &self.trailer.reference
    }

    /// A freshly shown movie, before enrichment and reviews arrive
    pub(crate) fn shown(selection: Selection, movie: Movie) -> Self {
        let readiness = if movie.external_metadata_id().is_some() {
            Readiness::StalePending
        } else {
            Readiness::Settled
        };
        Self {
            selection: Some(selection),
            phase: ViewPhase::Ready(readiness),
            movie: Some(movie),
            trailer: Trailer::none(),
            reviews: None,
        }
    }
}
