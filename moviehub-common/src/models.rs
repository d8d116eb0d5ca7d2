//! Catalog models shared by MovieHub clients
//!
//! Field names follow the backend's JSON. Reviews are accepted in both the
//! camelCase (`movieId`) and snake_case (`movie_id`) spellings the backend
//! has used.

use serde::{Deserialize, Serialize};

/// Movie identifier in the MovieHub catalog
pub type MovieId = i64;
/// TMDB identifier (0 when the movie is not linked)
pub type TmdbId = i64;
/// User identifier
pub type UserId = i64;

/// Catalog movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub tmdb_id: TmdbId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
}

impl Movie {
    /// External metadata id, when the movie is linked to TMDB
    pub fn external_metadata_id(&self) -> Option<TmdbId> {
        (self.tmdb_id > 0).then_some(self.tmdb_id)
    }
}

/// Review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(rename = "movieId", alias = "movie_id", default)]
    pub movie_id: MovieId,
    #[serde(rename = "userId", alias = "user_id", default)]
    pub user_id: UserId,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<String>,
}

/// Public user profile (`GET /api/users/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
}

/// Signed-in user's own profile (`GET /api/me`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_defaults_missing_fields() {
        let movie: Movie = serde_json::from_str(r#"{"id": 3, "title": "Heat"}"#).unwrap();
        assert_eq!(movie.tmdb_id, 0);
        assert_eq!(movie.external_metadata_id(), None);
        assert_eq!(movie.description, "");
    }

    #[test]
    fn test_review_accepts_both_spellings() {
        let camel: Review =
            serde_json::from_str(r#"{"id": 1, "movieId": 2, "userId": 7, "score": 4}"#).unwrap();
        let snake: Review =
            serde_json::from_str(r#"{"id": 1, "movie_id": 2, "user_id": 7, "score": 4}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.user_id, 7);
    }

    #[test]
    fn test_linked_movie_exposes_metadata_id() {
        let movie: Movie = serde_json::from_str(r#"{"id": 3, "tmdb_id": 949}"#).unwrap();
        assert_eq!(movie.external_metadata_id(), Some(949));
    }
}
