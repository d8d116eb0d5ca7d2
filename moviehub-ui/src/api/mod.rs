//! MovieHub backend access

pub mod client;
pub mod endpoints;

pub use client::ApiClient;
