//! In-memory collaborators with controllable completion order
//!
//! A held request parks on a zero-permit semaphore until the test releases
//! it, which lets a test decide which of two racing fetches lands first.

use moviehub_common::models::{Movie, MovieId, Review, TmdbId, UserId, UserProfile};
use moviehub_ui::error::{ClientError, ClientResult};
use moviehub_ui::media::RawMediaPayload;
use moviehub_ui::ports::{EntitySource, MetadataSource, ReviewSource, SubjectDirectory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    Movie(MovieId),
    Trailer(TmdbId),
    Reviews(MovieId),
    User(UserId),
}

#[derive(Default)]
struct Gates {
    held: Mutex<HashMap<Request, Arc<Semaphore>>>,
}

impl Gates {
    fn hold(&self, request: Request) {
        self.held
            .lock()
            .unwrap()
            .insert(request, Arc::new(Semaphore::new(0)));
    }

    fn release(&self, request: Request) {
        if let Some(gate) = self.held.lock().unwrap().get(&request) {
            gate.add_permits(1);
        }
    }

    async fn pass(&self, request: Request) {
        let gate = self.held.lock().unwrap().get(&request).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

pub fn movie(id: MovieId, tmdb_id: TmdbId, title: &str) -> Movie {
    Movie {
        id,
        tmdb_id,
        title: title.to_string(),
        year: 2000 + id as i32,
        description: format!("About {title}"),
        rating: 7.5,
    }
}

pub fn review(id: i64, movie_id: MovieId, user_id: UserId, score: i32) -> Review {
    Review {
        id,
        movie_id,
        user_id,
        score,
        text: format!("Review {id}"),
        created_at: None,
    }
}

pub fn youtube_payload(key: &str) -> RawMediaPayload {
    RawMediaPayload::from_json(serde_json::json!({
        "trailer_url": format!("https://www.youtube.com/watch?v={key}"),
        "key": key,
    }))
}

/// Movie, trailer and review backend
#[derive(Default)]
pub struct FakeCatalog {
    movies: Mutex<HashMap<MovieId, ClientResult<Movie>>>,
    trailers: Mutex<HashMap<TmdbId, ClientResult<RawMediaPayload>>>,
    reviews: Mutex<HashMap<MovieId, ClientResult<Vec<Review>>>>,
    gates: Gates,
    calls: Mutex<Vec<Request>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_movie(&self, movie: Movie) {
        self.movies.lock().unwrap().insert(movie.id, Ok(movie));
    }

    pub fn fail_movie(&self, id: MovieId, error: ClientError) {
        self.movies.lock().unwrap().insert(id, Err(error));
    }

    pub fn set_trailer(&self, tmdb_id: TmdbId, payload: RawMediaPayload) {
        self.trailers.lock().unwrap().insert(tmdb_id, Ok(payload));
    }

    pub fn fail_trailer(&self, tmdb_id: TmdbId, error: ClientError) {
        self.trailers.lock().unwrap().insert(tmdb_id, Err(error));
    }

    pub fn set_reviews(&self, movie_id: MovieId, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().insert(movie_id, Ok(reviews));
    }

    pub fn fail_reviews(&self, movie_id: MovieId, error: ClientError) {
        self.reviews.lock().unwrap().insert(movie_id, Err(error));
    }

    /// Park the next matching request until [`FakeCatalog::release`]
    pub fn hold(&self, request: Request) {
        self.gates.hold(request);
    }

    pub fn release(&self, request: Request) {
        self.gates.release(request);
    }

    pub fn call_count(&self, request: Request) -> usize {
        self.calls.lock().unwrap().iter().filter(|r| **r == request).count()
    }

    async fn enter(&self, request: Request) {
        self.calls.lock().unwrap().push(request);
        self.gates.pass(request).await;
    }
}

#[async_trait::async_trait]
impl EntitySource for FakeCatalog {
    async fn fetch_movie(&self, id: MovieId) -> ClientResult<Movie> {
        self.enter(Request::Movie(id)).await;
        self.movies
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::NotFound(format!("movie {id}"))))
    }
}

#[async_trait::async_trait]
impl MetadataSource for FakeCatalog {
    async fn fetch_trailer(&self, tmdb_id: TmdbId) -> ClientResult<RawMediaPayload> {
        self.enter(Request::Trailer(tmdb_id)).await;
        self.trailers
            .lock()
            .unwrap()
            .get(&tmdb_id)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::NotFound(format!("tmdb {tmdb_id}"))))
    }
}

#[async_trait::async_trait]
impl ReviewSource for FakeCatalog {
    async fn fetch_reviews(&self, movie_id: MovieId) -> ClientResult<Vec<Review>> {
        self.enter(Request::Reviews(movie_id)).await;
        self.reviews
            .lock()
            .unwrap()
            .get(&movie_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// User directory counting remote lookups
#[derive(Default)]
pub struct FakeDirectory {
    users: Mutex<HashMap<UserId, UserProfile>>,
    failing: Mutex<HashMap<UserId, ClientError>>,
    gates: Gates,
    lookups: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, id: UserId, username: &str) {
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id,
                username: username.to_string(),
            },
        );
    }

    pub fn fail_user(&self, id: UserId, error: ClientError) {
        self.failing.lock().unwrap().insert(id, error);
    }

    pub fn recover_user(&self, id: UserId) {
        self.failing.lock().unwrap().remove(&id);
    }

    pub fn hold(&self, id: UserId) {
        self.gates.hold(Request::User(id));
    }

    pub fn release(&self, id: UserId) {
        self.gates.release(Request::User(id));
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SubjectDirectory for FakeDirectory {
    async fn fetch_user(&self, token: &str, id: UserId) -> ClientResult<UserProfile> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());
        self.gates.pass(Request::User(id)).await;

        if let Some(error) = self.failing.lock().unwrap().get(&id) {
            return Err(error.clone());
        }
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("user not found".to_string()))
    }
}
