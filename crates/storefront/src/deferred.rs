//! Deferred page data and streamed HTML responses.
//!
//! A page that has slow, non-critical data spawns that fetch as a
//! [`Deferred`] value, renders its shell with a fallback in place, and
//! streams the shell immediately. Once the deferred value resolves, a second
//! chunk carries the real markup in a `<template>` plus a small inline script
//! that swaps it in.

use std::future::Future;

use askama::Template;
use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

/// Error resolving a deferred value.
#[derive(Debug, Error)]
pub enum DeferredError {
    /// The task panicked or was cancelled.
    #[error("deferred task failed: {0}")]
    Join(#[from] JoinError),
}

/// A value being computed on another task.
///
/// Dropping a `Deferred` before it resolves aborts the task, so a client
/// that disconnects mid-stream does not leave fetches running.
#[derive(Debug)]
pub struct Deferred<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Start `future` on the runtime without awaiting it.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Wait for the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked or was aborted.
    pub async fn resolve(mut self) -> Result<T, DeferredError> {
        Ok((&mut self.handle).await?)
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The late chunk for one deferred section.
#[derive(Template)]
#[template(path = "partials/deferred.html")]
pub struct DeferredChunk<'a> {
    /// Element id of the fallback to replace.
    pub target: &'a str,
    /// CSP nonce for the swap script.
    pub nonce: &'a str,
    /// Rendered markup for the section.
    pub content: &'a str,
}

impl DeferredChunk<'_> {
    /// Render the chunk, falling back to a bare document close.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.render().unwrap_or_else(|e| {
            tracing::error!(error = %e, target = self.target, "Failed to render deferred chunk");
            DOCUMENT_CLOSE.to_string()
        })
    }
}

/// Markup closing the document after the last deferred chunk.
pub const DOCUMENT_CLOSE: &str = "</body></html>";

/// Stream `shell` right away, then whatever `tail` produces.
///
/// The shell must leave `<body>` open; `tail` is expected to close it.
pub fn streamed_html<F>(shell: String, tail: F) -> Response
where
    F: Future<Output = String> + Send + 'static,
{
    let stream = async_stream::stream! {
        yield Ok::<_, std::convert::Infallible>(Bytes::from(shell));
        yield Ok(Bytes::from(tail.await));
    };

    let mut response = Body::from_stream(stream).into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn test_deferred_resolves_value() {
        let deferred = Deferred::spawn(async { 41 + 1 });
        assert_eq!(deferred.resolve().await.expect("value"), 42);
    }

    #[tokio::test]
    async fn test_deferred_panic_is_an_error() {
        let deferred: Deferred<u8> = Deferred::spawn(async { panic!("boom") });
        assert!(deferred.resolve().await.is_err());
    }

    #[tokio::test]
    async fn test_dropping_deferred_aborts_task() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let deferred = Deferred::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(deferred);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_streamed_html_sends_shell_then_tail() {
        let response = streamed_html("<html><body>shell".to_string(), async {
            "tail</body></html>".to_string()
        });
        assert_eq!(
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(body.as_ref(), b"<html><body>shelltail</body></html>");
    }

    #[test]
    fn test_chunk_wraps_content_in_template() {
        let html = DeferredChunk {
            target: "product-options",
            nonce: "abc123",
            content: "<ul><li>M</li></ul>",
        }
        .to_html();
        assert!(html.contains(r#"<template id="deferred-product-options"><ul><li>M</li></ul></template>"#));
        assert!(html.contains(r#"<script nonce="abc123">"#));
        assert!(html.trim_end().ends_with(DOCUMENT_CLOSE));
    }
}
