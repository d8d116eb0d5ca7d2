//! Trailer reference normalization
//!
//! Turns any [`RawMediaPayload`] into a canonical YouTube reference or a
//! definite [`MediaReference::Unresolved`]. Pure: no I/O, never panics,
//! never errors. Unexpected shapes mean "no trailer", not failure.

use super::payload::{MediaRecord, RawMediaPayload, VideoCandidate};
use percent_encoding::percent_decode_str;
use reqwest::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const WATCH_BASE: &str = "https://www.youtube.com/watch";

const SHORT_LINK_HOST: &str = "youtu.be";
const CANONICAL_HOST: &str = "youtube.com";
const NOCOOKIE_HOST: &str = "youtube-nocookie.com";

const BARE_ID_MIN_LEN: usize = 6;
const BARE_ID_MAX_LEN: usize = 20;

/// Canonical trailer reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    Resolved { embed_url: Url, public_url: Url },
    Unresolved,
}

impl MediaReference {
    /// Reference for a bare YouTube video id
    pub fn from_video_id(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            return MediaReference::Unresolved;
        }

        let (Ok(mut embed_url), Ok(mut public_url)) = (Url::parse(EMBED_BASE), Url::parse(WATCH_BASE))
        else {
            return MediaReference::Unresolved;
        };

        match embed_url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push(id);
            }
            Err(()) => return MediaReference::Unresolved,
        }
        // Dot segments are swallowed by the push; the id must survive as `/embed/<id>`
        let kept = embed_url
            .path_segments()
            .map(|segments| segments.collect::<Vec<_>>())
            .is_some_and(|segments| matches!(segments.as_slice(), ["embed", last] if !last.is_empty()));
        if !kept {
            return MediaReference::Unresolved;
        }
        public_url.query_pairs_mut().append_pair("v", id);

        MediaReference::Resolved {
            embed_url,
            public_url,
        }
    }

    /// Already-embeddable URL, used verbatim for both forms
    fn passthrough(url: &Url) -> Self {
        MediaReference::Resolved {
            embed_url: url.clone(),
            public_url: url.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, MediaReference::Resolved { .. })
    }

    pub fn embed_url(&self) -> Option<&Url> {
        match self {
            MediaReference::Resolved { embed_url, .. } => Some(embed_url),
            MediaReference::Unresolved => None,
        }
    }

    pub fn public_url(&self) -> Option<&Url> {
        match self {
            MediaReference::Resolved { public_url, .. } => Some(public_url),
            MediaReference::Unresolved => None,
        }
    }

    /// Player source: the embed URL with related-video suggestions turned off
    pub fn player_src(&self) -> Option<String> {
        let mut src = self.embed_url()?.clone();
        src.query_pairs_mut().append_pair("rel", "0");
        Some(src.into())
    }
}

/// Everything the detail view needs to show a trailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    pub reference: MediaReference,
    /// Link for manual opening; present even when nothing is embeddable
    pub link: Option<Url>,
}

impl Trailer {
    pub fn none() -> Self {
        Self {
            reference: MediaReference::Unresolved,
            link: None,
        }
    }
}

impl Default for Trailer {
    fn default() -> Self {
        Self::none()
    }
}

/// Normalize a payload into a canonical reference
pub fn normalize(payload: &RawMediaPayload) -> MediaReference {
    match payload {
        RawMediaPayload::Text(text) => normalize_text(text),
        RawMediaPayload::Record(record) => normalize_record(record),
        RawMediaPayload::Unrecognized => MediaReference::Unresolved,
    }
}

/// Normalize a payload and pick the link surfaced for manual opening
///
/// The relay's own reference wins for the link; the canonical public URL is
/// used only when the relay gave none.
pub fn resolve_trailer(payload: &RawMediaPayload) -> Trailer {
    let reference = normalize(payload);
    let link = payload
        .direct_reference()
        .and_then(parse_web_url)
        .or_else(|| reference.public_url().cloned());

    Trailer { reference, link }
}

fn normalize_record(record: &MediaRecord) -> MediaReference {
    if let Some(direct) = &record.direct_reference {
        let reference = normalize_text(direct);
        if reference.is_resolved() {
            return reference;
        }
    }

    if let Some(key) = &record.video_key {
        let reference = MediaReference::from_video_id(key);
        if reference.is_resolved() {
            return reference;
        }
    }

    select_candidate(&record.candidates)
        .and_then(|candidate| candidate.key.as_deref())
        .map(MediaReference::from_video_id)
        .unwrap_or(MediaReference::Unresolved)
}

/// Trailer before teaser before whatever came first
fn select_candidate(candidates: &[VideoCandidate]) -> Option<&VideoCandidate> {
    let youtube_of_kind = |wanted: &str| {
        candidates.iter().find(|c| {
            contains_ignore_case(c.site.as_deref(), "youtube")
                && contains_ignore_case(c.kind.as_deref(), wanted)
        })
    };

    youtube_of_kind("trailer")
        .or_else(|| youtube_of_kind("teaser"))
        .or_else(|| candidates.first())
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_ascii_lowercase().contains(needle))
        .unwrap_or(false)
}

fn normalize_text(text: &str) -> MediaReference {
    let text = text.trim();
    match Url::parse(text) {
        Ok(url) => normalize_url(&url),
        Err(_) if is_bare_video_id(text) => MediaReference::from_video_id(text),
        Err(_) => MediaReference::Unresolved,
    }
}

fn normalize_url(url: &Url) -> MediaReference {
    if !matches!(url.scheme(), "http" | "https") {
        return MediaReference::Unresolved;
    }
    let Some(host) = url.host_str() else {
        return MediaReference::Unresolved;
    };

    if host_matches(host, SHORT_LINK_HOST) {
        return first_path_segment(url)
            .map(|id| MediaReference::from_video_id(&id))
            .unwrap_or(MediaReference::Unresolved);
    }

    if host_matches(host, NOCOOKIE_HOST) {
        return MediaReference::passthrough(url);
    }

    if host_matches(host, CANONICAL_HOST) {
        if let Some(id) = query_value(url, "v") {
            return MediaReference::from_video_id(&id);
        }
        if url.path().starts_with("/embed/") && url.path().len() > "/embed/".len() {
            return MediaReference::passthrough(url);
        }
    }

    MediaReference::Unresolved
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn first_path_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_bare_video_id(text: &str) -> bool {
    (BARE_ID_MIN_LEN..=BARE_ID_MAX_LEN).contains(&text.len())
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn parse_web_url(text: &str) -> Option<Url> {
    Url::parse(text.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
