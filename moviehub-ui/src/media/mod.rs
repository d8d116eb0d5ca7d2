//! Trailer payload parsing and normalization

pub mod normalizer;
pub mod payload;

pub use normalizer::{normalize, resolve_trailer, MediaReference, Trailer};
pub use payload::{MediaRecord, RawMediaPayload, VideoCandidate};
