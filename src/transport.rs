//! Seam between resolved requests and whatever sends them.
//!
//! This crate ships no transport. Implementors open connections, write the
//! request and return the response as plain data; retries that need
//! different arguments go through `Request::reresolve`.

use async_trait::async_trait;

use crate::domain::{HeaderMap, Request};

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a fully resolved request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> anyhow::Result<HttpResponse>;
}
