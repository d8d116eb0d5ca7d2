//! Plain-text presentation of catalog, detail and review views

use crate::session::LabelCache;
use crate::view::{ViewPhase, ViewState};
use moviehub_common::events::Readiness;
use moviehub_common::models::{Movie, Review, UserId};
use std::collections::HashMap;
use std::fmt::Write;

const MISSING: &str = "—";

fn title_or_missing(movie: &Movie, missing: &str) -> String {
    let title = movie.title.trim();
    if title.is_empty() {
        missing.to_string()
    } else {
        title.to_string()
    }
}

fn year_text(movie: &Movie) -> String {
    if movie.year > 0 {
        movie.year.to_string()
    } else {
        MISSING.to_string()
    }
}

fn rating_text(movie: &Movie) -> String {
    format!("★ {:.1}", movie.rating)
}

/// One catalog entry
pub fn movie_line(movie: &Movie) -> String {
    format!(
        "{}  {}  {}  id:{}",
        title_or_missing(movie, "Untitled"),
        year_text(movie),
        rating_text(movie),
        movie.id
    )
}

/// Catalog listing with an item count header
pub fn movie_list(movies: &[Movie]) -> String {
    let mut out = format!("{} items\n", movies.len());
    for movie in movies {
        out.push_str(&movie_line(movie));
        out.push('\n');
    }
    out
}

/// Detail view for the current coordinator state
pub fn detail_view(view: &ViewState) -> String {
    let Some(movie) = &view.movie else {
        return match view.phase {
            ViewPhase::Loading => "Loading...\n".to_string(),
            _ => "Select a movie to see details.\n".to_string(),
        };
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", title_or_missing(movie, MISSING));
    let _ = writeln!(out, "{}  {}  TMDB: {}", year_text(movie), rating_text(movie), movie.tmdb_id.max(0));

    let description = movie.description.trim();
    let _ = writeln!(
        out,
        "{}",
        if description.is_empty() { "No description." } else { description }
    );

    match (view.phase, view.trailer.reference.player_src()) {
        (_, Some(src)) => {
            let _ = writeln!(out, "Trailer: {src}");
        }
        (ViewPhase::Ready(Readiness::StalePending), None) => {
            let _ = writeln!(out, "Trailer: loading...");
        }
        (_, None) => {}
    }
    if let Some(link) = &view.trailer.link {
        let _ = writeln!(out, "Open trailer: {link}");
    }

    out
}

/// Review list with reviewer labels
///
/// Each distinct reviewer is resolved once per call.
pub async fn review_list(reviews: &[Review], labels: &LabelCache) -> String {
    if reviews.is_empty() {
        return "No reviews yet.\n".to_string();
    }

    let mut resolved: HashMap<UserId, String> = HashMap::new();
    let mut out = String::new();
    for review in reviews {
        let label = match resolved.get(&review.user_id) {
            Some(label) => label.clone(),
            None => {
                let label = labels.resolve(review.user_id).await;
                resolved.insert(review.user_id, label.clone());
                label
            }
        };

        let _ = writeln!(out, "{label}  Score: {}", review.score);
        let text = review.text.trim();
        if !text.is_empty() {
            let _ = writeln!(out, "  {text}");
        }
    }
    out
}
