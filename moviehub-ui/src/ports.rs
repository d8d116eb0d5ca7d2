//! Collaborator interfaces consumed by the view layer
//!
//! [`crate::api::ApiClient`] implements all of them against the MovieHub
//! backend; tests substitute in-memory fakes.

use crate::error::ClientResult;
use crate::media::RawMediaPayload;
use moviehub_common::models::{Movie, MovieId, Review, TmdbId, UserId, UserProfile};

/// Authoritative movie fetch
#[async_trait::async_trait]
pub trait EntitySource: Send + Sync {
    /// `Err(ClientError::NotFound)` when the movie does not exist
    async fn fetch_movie(&self, id: MovieId) -> ClientResult<Movie>;
}

/// Best-effort enrichment fetch (trailer info relayed from TMDB)
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_trailer(&self, tmdb_id: TmdbId) -> ClientResult<RawMediaPayload>;
}

/// Reviews of a movie
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_reviews(&self, movie_id: MovieId) -> ClientResult<Vec<Review>>;
}

/// User profile lookup; requires a bearer token
#[async_trait::async_trait]
pub trait SubjectDirectory: Send + Sync {
    async fn fetch_user(&self, token: &str, id: UserId) -> ClientResult<UserProfile>;
}
