//! MovieHub backend HTTP client

use super::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::media::RawMediaPayload;
use crate::ports::{EntitySource, MetadataSource, ReviewSource, SubjectDirectory};
use moviehub_common::models::{Me, Movie, MovieId, Review, TmdbId, UserId, UserProfile};
use reqwest::{header, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("moviehub-ui/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// MovieHub API client
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn get(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        let request = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json");
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// `GET /api/movies`
    pub async fn list_movies(&self) -> ClientResult<Vec<Movie>> {
        let url = self.url(endpoints::MOVIES)?;
        self.send_json(self.get(url, None)).await
    }

    /// `GET /api/movies/search`; a year of 0 or less is left out
    pub async fn search_movies(&self, title: Option<&str>, year: Option<i32>) -> ClientResult<Vec<Movie>> {
        let mut url = self.url(endpoints::MOVIE_SEARCH)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
                query.append_pair("title", title);
            }
            if let Some(year) = year.filter(|y| *y > 0) {
                query.append_pair("year", &year.to_string());
            }
        }
        tracing::debug!(url = %url, "Searching movies");
        self.send_json(self.get(url, None)).await
    }

    /// `GET /api/movies/{id}`
    pub async fn get_movie(&self, id: MovieId) -> ClientResult<Movie> {
        let url = self.url(&endpoints::movie(id))?;
        self.send_json(self.get(url, None)).await
    }

    /// `GET /api/tmdb/movies/{tmdb_id}`
    pub async fn get_trailer(&self, tmdb_id: TmdbId) -> ClientResult<RawMediaPayload> {
        let url = self.url(&endpoints::tmdb_movie(tmdb_id))?;
        let value: serde_json::Value = self.send_json(self.get(url, None)).await?;
        Ok(RawMediaPayload::from_json(value))
    }

    /// `GET /api/movies/{id}/reviews`
    pub async fn list_reviews(&self, movie_id: MovieId) -> ClientResult<Vec<Review>> {
        let url = self.url(&endpoints::reviews(movie_id))?;
        self.send_json(self.get(url, None)).await
    }

    /// `GET /api/users/{id}`
    pub async fn get_user(&self, token: &str, id: UserId) -> ClientResult<UserProfile> {
        let url = self.url(&endpoints::user(id))?;
        self.send_json(self.get(url, Some(token))).await
    }

    /// `GET /api/me`
    pub async fn me(&self, token: &str) -> ClientResult<Me> {
        let url = self.url(endpoints::ME)?;
        self.send_json(self.get(url, Some(token))).await
    }

    /// `POST /api/auth/login`, returning the bearer token
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let url = self.url(endpoints::AUTH_LOGIN)?;
        let request = self
            .http_client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { email, password });

        let response: LoginResponse = self.send_json(request).await?;
        tracing::info!(email = %email, "Signed in");
        Ok(response.token)
    }
}

/// Map a non-success response to an error carrying the backend's message
fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait::async_trait]
impl EntitySource for ApiClient {
    async fn fetch_movie(&self, id: MovieId) -> ClientResult<Movie> {
        self.get_movie(id).await
    }
}

#[async_trait::async_trait]
impl MetadataSource for ApiClient {
    async fn fetch_trailer(&self, tmdb_id: TmdbId) -> ClientResult<RawMediaPayload> {
        self.get_trailer(tmdb_id).await
    }
}

#[async_trait::async_trait]
impl ReviewSource for ApiClient {
    async fn fetch_reviews(&self, movie_id: MovieId) -> ClientResult<Vec<Review>> {
        self.list_reviews(movie_id).await
    }
}

#[async_trait::async_trait]
impl SubjectDirectory for ApiClient {
    async fn fetch_user(&self, token: &str, id: UserId) -> ClientResult<UserProfile> {
        self.get_user(token, id).await
    }
}
