//! # MovieHub Common Library
//!
//! Shared code for the MovieHub client crates:
//! - Catalog models (movies, reviews, user profiles)
//! - View events and the EventBus used for change notification
//! - Bootstrap configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
