// Common test utilities shared across test files

use async_trait::async_trait;
use request_template::{HeaderMap, HttpMethod, HttpResponse, Request, RequestTemplate, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Build an argument map from string pairs
#[allow(dead_code)]
pub fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The `GET /users/{id}` template with an `X-Trace: {traceId}` header
#[allow(dead_code)]
pub fn user_template() -> Arc<RequestTemplate> {
    let mut template = RequestTemplate::for_operation("get_user");
    template
        .set_method(HttpMethod::Get)
        .set_url_pattern("/users/{id}")
        .add_header_pattern("X-Trace", "{traceId}");
    template.into_shared()
}

/// In-memory transport that records every request and answers with canned statuses
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Request>>,
    pub statuses: Mutex<Vec<u16>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn with_statuses(statuses: &[u16]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().rev().copied().collect()),
        }
    }

    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: Request) -> anyhow::Result<HttpResponse> {
        let status = self.statuses.lock().unwrap().pop().unwrap_or(200);
        let body = request.url().to_string();
        self.sent.lock().unwrap().push(request);
        Ok(HttpResponse {
            status,
            headers: HeaderMap::new(),
            body,
        })
    }
}
