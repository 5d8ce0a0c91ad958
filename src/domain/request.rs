//! Immutable, dispatch-ready HTTP requests.
//!
//! A `Request` is a snapshot: every field is owned, copied in at
//! construction and only handed out through shared borrows. That makes it
//! `Send + Sync` and safe to pass to a transport on any thread.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::method::HttpMethod;
use super::request_template::RequestTemplate;
use super::template::BodyEncoding;
use crate::error::RequestError;

/// Header name to its values, in the order they were added.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

/// An immutable request to an HTTP server.
#[derive(Clone, Serialize)]
pub struct Request {
    method: HttpMethod,
    url: String,
    headers: HeaderMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_encoding: Option<BodyEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_id: Option<String>,
    #[serde(skip)]
    template: Option<Arc<RequestTemplate>>,
}

impl Request {
    /// Builds a request from fully resolved values.
    ///
    /// `headers` is copied, so later changes to the caller's map are not
    /// observed. Fails with `InvalidArgument` when a header name is not an
    /// HTTP token or a header value contains CR, LF or NUL.
    pub fn create<I, K, V, S>(
        method: HttpMethod,
        url: impl Into<String>,
        headers: I,
        body: Option<&str>,
        context_id: Option<&str>,
        template: Option<Arc<RequestTemplate>>,
    ) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Request::builder()
            .method(method)
            .url(url)
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(context_id) = context_id {
            builder = builder.context_id(context_id);
        }
        if let Some(template) = template {
            builder = builder.template(template);
        }
        builder.build()
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Values of one header, matched case-sensitively
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(Vec::as_slice)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// How placeholder values in the body were escaped; `None` when unknown
    pub fn body_encoding(&self) -> Option<BodyEncoding> {
        self.body_encoding
    }

    /// True when the body was resolved without a content type, so its values
    /// went in verbatim and escaping was left to the caller
    pub fn is_body_caller_escaped(&self) -> bool {
        self.body.is_some() && self.body_encoding == Some(BodyEncoding::Literal)
    }

    pub fn context_id(&self) -> Option<&str> {
        self.context_id.as_deref()
    }

    /// The template this request was resolved from, if any
    pub fn template(&self) -> Option<&Arc<RequestTemplate>> {
        self.template.as_ref()
    }

    /// Resolves the originating template again with new arguments, keeping the context id.
    ///
    /// Used by retry flows that need to adjust call arguments.
    pub fn reresolve(&self, arguments: &HashMap<String, String>) -> Result<Request, RequestError> {
        let template = self.template.as_ref().ok_or_else(|| {
            RequestError::invalid("request was not resolved from a template")
        })?;
        template.resolve_with_context(arguments, self.context_id.as_deref())
    }
}

// Templates compare by identity: two requests are equal only if they came from the same template instance.
impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        let same_template = match (&self.template, &other.template) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_template
            && self.method == other.method
            && self.url == other.url
            && self.headers == other.headers
            && self.body == other.body
            && self.body_encoding == other.body_encoding
            && self.context_id == other.context_id
    }
}

impl Eq for Request {}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("body_encoding", &self.body_encoding)
            .field("context_id", &self.context_id)
            .field(
                "template",
                &self.template.as_ref().map(|t| t.operation().unwrap_or("<unnamed>")),
            )
            .finish()
    }
}

/// Step-by-step construction of a `Request`.
///
/// Method, url and headers are required; `build` reports the first one
/// missing as `InvalidArgument`. An empty header map counts as present.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<HttpMethod>,
    url: Option<String>,
    headers: Option<HeaderMap>,
    body: Option<String>,
    body_encoding: Option<BodyEncoding>,
    context_id: Option<String>,
    template: Option<Arc<RequestTemplate>>,
}

impl RequestBuilder {
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces all headers with a copy of `headers`
    pub fn headers<I, K, V, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut copy = HeaderMap::new();
        for (name, values) in headers {
            copy.entry(name.as_ref().to_string())
                .or_default()
                .extend(values.into_iter().map(|v| v.as_ref().to_string()));
        }
        self.headers = Some(copy);
        self
    }

    /// Appends one header value
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = Some(encoding);
        self
    }

    pub fn context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn template(mut self, template: Arc<RequestTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    pub fn build(self) -> Result<Request, RequestError> {
        let method = self
            .method
            .ok_or_else(|| RequestError::invalid("method is required"))?;
        let url = self
            .url
            .ok_or_else(|| RequestError::invalid("url is required"))?;
        let headers = self
            .headers
            .ok_or_else(|| RequestError::invalid(format!("headers are required for {} {}", method, url)))?;

        for (name, values) in &headers {
            validate_header_name(name)?;
            for value in values {
                validate_header_value(name, value)?;
            }
        }

        Ok(Request {
            method,
            url,
            headers,
            body: self.body,
            body_encoding: self.body_encoding,
            context_id: self.context_id,
            template: self.template,
        })
    }
}

pub(crate) fn validate_header_name(name: &str) -> Result<(), RequestError> {
    let is_tchar = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);
    if name.is_empty() || !name.chars().all(is_tchar) {
        return Err(RequestError::invalid(format!("invalid header name '{}'", name)));
    }
    Ok(())
}

fn validate_header_value(name: &str, value: &str) -> Result<(), RequestError> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(RequestError::invalid(format!(
            "header '{}' has a value containing CR, LF or NUL",
            name
        )));
    }
    Ok(())
}
