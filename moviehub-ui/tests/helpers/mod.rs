//! Test helper utilities
//!
//! Shared utilities for testing moviehub-ui

#![allow(dead_code)]

pub mod fakes;
pub mod log_capture;

pub use fakes::{movie, review, youtube_payload, FakeCatalog, FakeDirectory, Request};
pub use log_capture::{capture_logs, LogCapture};

use moviehub_common::events::ViewEvent;
use moviehub_common::models::Me;
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive events until one matches, failing the test after a timeout
pub async fn wait_for_event<F>(rx: &mut broadcast::Receiver<ViewEvent>, mut predicate: F) -> ViewEvent
where
    F: FnMut(&ViewEvent) -> bool,
{
    tokio::time::timeout(EVENT_TIMEOUT, async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for view event")
}

/// Yield to spawned tasks until `condition` holds, failing after a timeout
pub async fn eventually<F>(mut condition: F, what: &str)
where
    F: FnMut() -> bool,
{
    let result = tokio::time::timeout(EVENT_TIMEOUT, async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for {what}");
}

pub fn profile(id: i64, username: &str) -> Me {
    Me {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: "user".to_string(),
    }
}
