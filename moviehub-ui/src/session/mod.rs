//! Identity session and identity-scoped caches

pub mod identity;
pub mod label_cache;

pub use identity::{Identity, IdentityContext, IdentitySession, SessionEpoch};
pub use label_cache::{placeholder_label, LabelCache};
