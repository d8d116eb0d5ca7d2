//! MovieHub backend routes

use moviehub_common::models::{MovieId, TmdbId, UserId};

pub const MOVIES: &str = "/api/movies";
pub const MOVIE_SEARCH: &str = "/api/movies/search";
pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const ME: &str = "/api/me";

pub fn movie(id: MovieId) -> String {
    format!("/api/movies/{id}")
}

pub fn tmdb_movie(tmdb_id: TmdbId) -> String {
    format!("/api/tmdb/movies/{tmdb_id}")
}

pub fn reviews(movie_id: MovieId) -> String {
    format!("/api/movies/{movie_id}/reviews")
}

pub fn user(id: UserId) -> String {
    format!("/api/users/{id}")
}
