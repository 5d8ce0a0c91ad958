// Positional value encodings

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// How a substituted value is escaped, chosen by where the placeholder sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Path segment or authority: everything outside the unreserved set becomes `%XX`
    PathSegment,
    /// Query or fragment value: form-urlencoded, space becomes `+`
    QueryValue,
    /// Inserted as-is
    Literal,
    /// Escaped for the inside of a JSON string literal
    JsonString,
}

impl Encoding {
    pub fn apply(self, value: &str) -> Result<String, RequestError> {
        match self {
            Encoding::PathSegment => Ok(urlencoding::encode(value).into_owned()),
            Encoding::QueryValue => Ok(form_encode(value)),
            Encoding::Literal => Ok(value.to_string()),
            Encoding::JsonString => {
                let quoted = serde_json::to_string(value).map_err(|e| {
                    RequestError::invalid(format!("cannot JSON-escape value: {}", e))
                })?;
                Ok(quoted[1..quoted.len() - 1].to_string())
            }
        }
    }
}

/// Content type of a body pattern, deciding how its placeholders are escaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// Unspecified content type; values are inserted literally and the caller escapes them
    #[default]
    Literal,
    Json,
    Form,
}

impl BodyEncoding {
    pub fn encoding(self) -> Encoding {
        match self {
            BodyEncoding::Literal => Encoding::Literal,
            BodyEncoding::Json => Encoding::JsonString,
            BodyEncoding::Form => Encoding::QueryValue,
        }
    }
}

pub(crate) fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
