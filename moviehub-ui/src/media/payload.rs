//! Trailer payload shapes accepted from the metadata relay
//!
//! The relay has answered with a bare URL string, a bare YouTube id, a
//! `{trailer_url, key}` object and a raw TMDB `{results: [...]}` videos
//! response. All of them are folded into [`RawMediaPayload`] in one step so
//! the normalizer can match exhaustively. Nothing here trusts the input:
//! fields of the wrong type are treated as absent.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Untrusted trailer payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawMediaPayload {
    /// URL, short link or bare platform id
    Text(String),
    /// Structured trailer info object
    Record(MediaRecord),
    /// null, numbers, booleans, arrays
    Unrecognized,
}

/// Structured trailer info
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaRecord {
    /// `trailer_url`: direct reference, non-empty strings only
    pub direct_reference: Option<String>,
    /// `key`: bare platform id
    pub video_key: Option<String>,
    /// `results`: candidate videos
    pub candidates: Vec<VideoCandidate>,
}

/// One entry of a TMDB videos list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoCandidate {
    pub site: Option<String>,
    pub kind: Option<String>,
    pub key: Option<String>,
}

impl RawMediaPayload {
    /// Fold an arbitrary JSON value into a payload
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => RawMediaPayload::Text(s),
            Value::Object(map) => RawMediaPayload::Record(MediaRecord::from_map(&map)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                RawMediaPayload::Unrecognized
            }
        }
    }

    /// Interpret a command-line argument: JSON when it parses, text otherwise
    pub fn from_cli_arg(arg: &str) -> Self {
        match serde_json::from_str::<Value>(arg) {
            Ok(value) => Self::from_json(value),
            Err(_) => RawMediaPayload::Text(arg.to_string()),
        }
    }

    /// Reference the relay wants surfaced as the public link
    pub fn direct_reference(&self) -> Option<&str> {
        match self {
            RawMediaPayload::Text(s) => Some(s.as_str()),
            RawMediaPayload::Record(record) => record.direct_reference.as_deref(),
            RawMediaPayload::Unrecognized => None,
        }
    }
}

impl From<Value> for RawMediaPayload {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl MediaRecord {
    fn from_map(map: &Map<String, Value>) -> Self {
        let candidates = match map.get("results") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(VideoCandidate::from_map)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            direct_reference: non_empty_str(map.get("trailer_url")),
            video_key: non_empty_str(map.get("key")),
            candidates,
        }
    }
}

impl VideoCandidate {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            site: non_empty_str(map.get("site")),
            kind: non_empty_str(map.get("type")),
            key: non_empty_str(map.get("key")),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
