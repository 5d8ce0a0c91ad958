// Domain model: HTTP methods, immutable requests and the templates that produce them

mod method;
mod request;
mod request_template;
pub mod template;

pub use method::HttpMethod;
pub use request::{HeaderMap, Request, RequestBuilder};
pub use request_template::{BodyPattern, RequestTemplate};
pub use template::BodyEncoding;
