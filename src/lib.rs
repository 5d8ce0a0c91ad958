//! Immutable HTTP request construction from reusable request templates.
//!
//! A [`RequestTemplate`] describes one remote operation: method, URL pattern,
//! header patterns and an optional body pattern, all of which may contain
//! `{name}` placeholders. It is configured once, published as an
//! `Arc<RequestTemplate>` and then resolved once per call:
//!
//! ```
//! use std::collections::HashMap;
//! use request_template::{HttpMethod, RequestTemplate};
//!
//! let mut template = RequestTemplate::for_operation("get_user");
//! template
//!     .set_method(HttpMethod::Get)
//!     .set_url_pattern("/users/{id}")
//!     .add_header_pattern("X-Trace", "{traceId}");
//! let template = template.into_shared();
//!
//! let args = HashMap::from([
//!     ("id".to_string(), "a/b".to_string()),
//!     ("traceId".to_string(), "abc".to_string()),
//! ]);
//! let request = template.resolve(&args).unwrap();
//! assert_eq!(request.url(), "/users/a%2Fb");
//! assert_eq!(request.header("X-Trace").unwrap(), ["abc"]);
//! ```
//!
//! The resulting [`Request`] is an owned, immutable snapshot and can be handed
//! to a [`Transport`] on any thread.

pub mod config;
pub mod context;
pub mod domain;
mod error;
pub mod transport;

pub use config::TemplateRegistry;
pub use domain::{
    BodyEncoding, HeaderMap, HttpMethod, Request, RequestBuilder, RequestTemplate,
};
pub use error::RequestError;
pub use transport::{HttpResponse, Transport};
