//! moviehub-ui library interface
//!
//! Exposes the client core for the terminal front end and for integration
//! testing.

pub mod api;
pub mod app;
pub mod error;
pub mod media;
pub mod ports;
pub mod render;
pub mod session;
pub mod view;

pub use crate::app::MovieHub;
pub use crate::error::{ClientError, ClientResult};
