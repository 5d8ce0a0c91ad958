//! Reusable, per-operation request blueprints.
//!
//! # Design
//! A `RequestTemplate` is configured once through its `&mut self` setters,
//! then published as `Arc<RequestTemplate>` and resolved concurrently through
//! `&self`. Resolution never changes the template. Changing a published
//! template goes through `Arc::make_mut`, which clones it when requests or
//! other callers still hold the old snapshot.
//!
//! Patterns are parsed on each `resolve`, so a malformed pattern surfaces as
//! `MalformedPattern` at resolution time. `validate` runs the same parse
//! eagerly for callers that want to fail at setup.
//!
//! Argument entries that match no placeholder are ignored. This leniency is
//! deliberate: one argument map can be shared by several overloaded
//! templates.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::method::HttpMethod;
use super::request::{validate_header_name, HeaderMap, Request};
use super::template::{
    form_encode, BodyEncoding, Encoding, Pattern, PatternParser, PatternResolver,
};
use crate::error::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPattern {
    pub pattern: String,
    pub encoding: BodyEncoding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTemplate {
    operation: Option<String>,
    method: Option<HttpMethod>,
    url_pattern: Option<String>,
    query_patterns: Vec<(String, String)>,
    header_patterns: BTreeMap<String, Vec<String>>,
    body: Option<BodyPattern>,
    body_encoding: BodyEncoding,
}

impl RequestTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A template named after the remote operation it describes
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    pub fn set_operation(&mut self, operation: impl Into<String>) -> &mut Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the HTTP method. Calling it again replaces the earlier method.
    pub fn set_method(&mut self, method: HttpMethod) -> &mut Self {
        if let Some(previous) = self.method.filter(|previous| *previous != method) {
            tracing::warn!(
                operation = self.operation().unwrap_or("<unnamed>"),
                %previous,
                %method,
                "replacing template method"
            );
        }
        self.method = Some(method);
        self
    }

    pub fn set_url_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.url_pattern = Some(pattern.into());
        self
    }

    /// Appends a value pattern; repeated names accumulate into a multi-valued header
    pub fn add_header_pattern(
        &mut self,
        name: impl Into<String>,
        value_pattern: impl Into<String>,
    ) -> &mut Self {
        self.header_patterns
            .entry(name.into())
            .or_default()
            .push(value_pattern.into());
        self
    }

    /// Appends a `name=value` query pair to the resolved url.
    ///
    /// The pair is left out when its value is made only of optional
    /// placeholders and none of them is bound.
    pub fn add_query_pattern(
        &mut self,
        name: impl Into<String>,
        value_pattern: impl Into<String>,
    ) -> &mut Self {
        self.query_patterns.push((name.into(), value_pattern.into()));
        self
    }

    pub fn set_body_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.body = Some(BodyPattern {
            pattern: pattern.into(),
            encoding: self.body_encoding,
        });
        self
    }

    pub fn set_body_encoding(&mut self, encoding: BodyEncoding) -> &mut Self {
        self.body_encoding = encoding;
        if let Some(body) = self.body.as_mut() {
            body.encoding = encoding;
        }
        self
    }

    pub fn clear_body_pattern(&mut self) -> &mut Self {
        self.body = None;
        self
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn url_pattern(&self) -> Option<&str> {
        self.url_pattern.as_deref()
    }

    pub fn header_patterns(&self) -> &BTreeMap<String, Vec<String>> {
        &self.header_patterns
    }

    pub fn query_patterns(&self) -> &[(String, String)] {
        &self.query_patterns
    }

    pub fn body_pattern(&self) -> Option<&BodyPattern> {
        self.body.as_ref()
    }

    /// Publishes the template for concurrent resolution
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Resolves every placeholder against `arguments` into an immutable request
    pub fn resolve(
        self: &Arc<Self>,
        arguments: &HashMap<String, String>,
    ) -> Result<Request, RequestError> {
        self.resolve_with_context(arguments, None)
    }

    /// Like `resolve`, threading an opaque correlation id into the request
    pub fn resolve_with_context(
        self: &Arc<Self>,
        arguments: &HashMap<String, String>,
        context_id: Option<&str>,
    ) -> Result<Request, RequestError> {
        let method = self.method.ok_or_else(|| RequestError::UnsupportedMethod {
            operation: self.operation.clone(),
        })?;
        let url_pattern = self
            .url_pattern
            .as_deref()
            .ok_or_else(|| RequestError::invalid("url pattern is not set"))?;

        let resolver = PatternResolver::new();

        let mut url = resolver.resolve_url(&PatternParser::parse(url_pattern)?, arguments)?;
        self.append_query(&resolver, &mut url, arguments)?;

        let mut headers = HeaderMap::new();
        for (name, patterns) in &self.header_patterns {
            let values = headers.entry(name.clone()).or_insert_with(Vec::new);
            for pattern in patterns {
                let parsed = PatternParser::parse(pattern)?;
                values.push(resolver.resolve(&parsed, arguments, Encoding::Literal)?);
            }
        }

        let body = match &self.body {
            Some(body) => {
                let parsed = PatternParser::parse(&body.pattern)?;
                let value = resolver.resolve(&parsed, arguments, body.encoding.encoding())?;
                Some((value, body.encoding))
            }
            None => None,
        };

        tracing::debug!(
            operation = self.operation().unwrap_or("<unnamed>"),
            %method,
            %url,
            headers = headers.len(),
            has_body = body.is_some(),
            "resolved request template"
        );

        let mut builder = Request::builder()
            .method(method)
            .url(url)
            .headers(headers)
            .template(Arc::clone(self));
        if let Some((body, encoding)) = body {
            builder = builder.body(body).body_encoding(encoding);
        }
        if let Some(context_id) = context_id {
            builder = builder.context_id(context_id);
        }
        builder.build()
    }

    fn append_query(
        &self,
        resolver: &PatternResolver,
        url: &mut String,
        arguments: &HashMap<String, String>,
    ) -> Result<(), RequestError> {
        if self.query_patterns.is_empty() {
            return Ok(());
        }

        // Query pairs go before any fragment
        let fragment = url.find('#').map(|idx| url.split_off(idx));

        for (name, pattern) in &self.query_patterns {
            let parsed = PatternParser::parse(pattern)?;
            if resolver.resolves_empty(&parsed, arguments) {
                tracing::trace!(query = %name, "query pair omitted");
                continue;
            }
            let value = resolver.resolve(&parsed, arguments, Encoding::QueryValue)?;
            if !url.contains('?') {
                url.push('?');
            } else if !url.ends_with(['?', '&']) {
                url.push('&');
            }
            url.push_str(&form_encode(name));
            url.push('=');
            url.push_str(&value);
        }

        if let Some(fragment) = fragment {
            url.push_str(&fragment);
        }
        Ok(())
    }

    /// Parses every pattern and checks header names, reporting the first error
    pub fn validate(&self) -> Result<(), RequestError> {
        for name in self.header_patterns.keys() {
            validate_header_name(name)?;
        }
        self.parsed_patterns().map(|_| ())
    }

    /// Distinct placeholder names referenced anywhere in the template
    pub fn placeholders(&self) -> Result<BTreeSet<String>, RequestError> {
        Ok(self
            .parsed_patterns()?
            .iter()
            .flat_map(|pattern| pattern.placeholders())
            .map(|expr| expr.name.clone())
            .collect())
    }

    /// Required placeholders that `arguments` leaves unbound
    pub fn missing_placeholders(
        &self,
        arguments: &HashMap<String, String>,
    ) -> Result<BTreeSet<String>, RequestError> {
        let resolver = PatternResolver::new();
        Ok(self
            .parsed_patterns()?
            .iter()
            .flat_map(|pattern| resolver.missing_placeholders(pattern, arguments))
            .collect())
    }

    fn parsed_patterns(&self) -> Result<Vec<Pattern>, RequestError> {
        let sources = self
            .url_pattern
            .iter()
            .chain(self.query_patterns.iter().map(|(_, p)| p))
            .chain(self.header_patterns.values().flatten())
            .chain(self.body.iter().map(|b| &b.pattern));

        sources.map(|s| PatternParser::parse(s)).collect()
    }
}
