// Placeholder resolution

use std::collections::HashMap;

use super::ast::{Pattern, PatternPart, PipelineOp, PlaceholderExpr};
use super::encoding::Encoding;
use crate::error::RequestError;

/// Where the scanner currently is inside a URL pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlPosition {
    Path,
    Query,
    Fragment,
}

impl UrlPosition {
    fn advance(self, literal: &str) -> Self {
        literal.chars().fold(self, |pos, ch| match (pos, ch) {
            (UrlPosition::Path, '?') => UrlPosition::Query,
            (UrlPosition::Path | UrlPosition::Query, '#') => UrlPosition::Fragment,
            (pos, _) => pos,
        })
    }

    fn encoding(self) -> Encoding {
        match self {
            UrlPosition::Path => Encoding::PathSegment,
            UrlPosition::Query | UrlPosition::Fragment => Encoding::QueryValue,
        }
    }
}

/// Substitutes argument values into parsed patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternResolver;

impl PatternResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a URL pattern, encoding each value for the URL component it lands in
    pub fn resolve_url(
        &self,
        pattern: &Pattern,
        arguments: &HashMap<String, String>,
    ) -> Result<String, RequestError> {
        let mut result = String::new();
        let mut position = UrlPosition::Path;

        for part in &pattern.parts {
            match part {
                PatternPart::Literal(s) => {
                    position = position.advance(s);
                    result.push_str(s);
                }
                PatternPart::Placeholder(expr) => {
                    let value = self.substitute(expr, arguments, position.encoding())?;
                    result.push_str(&value);
                }
            }
        }

        Ok(result)
    }

    /// Resolve a pattern where every value gets the same encoding
    pub fn resolve(
        &self,
        pattern: &Pattern,
        arguments: &HashMap<String, String>,
        encoding: Encoding,
    ) -> Result<String, RequestError> {
        let mut result = String::new();

        for part in &pattern.parts {
            match part {
                PatternPart::Literal(s) => result.push_str(s),
                PatternPart::Placeholder(expr) => {
                    result.push_str(&self.substitute(expr, arguments, encoding)?);
                }
            }
        }

        Ok(result)
    }

    fn substitute(
        &self,
        expr: &PlaceholderExpr,
        arguments: &HashMap<String, String>,
        encoding: Encoding,
    ) -> Result<String, RequestError> {
        // An empty argument is a value, not an absence
        let raw = match arguments.get(&expr.name).or(expr.default.as_ref()) {
            Some(value) => value.clone(),
            None if expr.is_optional => {
                tracing::trace!(placeholder = %expr.name, "optional placeholder omitted");
                return Ok(String::new());
            }
            None => {
                return Err(RequestError::UnresolvedPlaceholder {
                    name: expr.name.clone(),
                })
            }
        };

        let mut value = raw;
        for op in &expr.pipelines {
            value = match op {
                PipelineOp::Trim => value.trim().to_string(),
                PipelineOp::Encode => urlencoding::encode(&value).into_owned(),
                PipelineOp::NoEncode => value,
            };
        }

        if !expr.overrides_encoding() {
            value = encoding.apply(&value)?;
        }

        tracing::trace!(placeholder = %expr.name, ?encoding, "placeholder substituted");
        Ok(value)
    }

    /// True when every part is an optional placeholder left unbound, so the
    /// pattern resolves to nothing at all
    pub fn resolves_empty(&self, pattern: &Pattern, arguments: &HashMap<String, String>) -> bool {
        !pattern.parts.is_empty()
            && pattern.parts.iter().all(|part| match part {
                PatternPart::Placeholder(expr) => {
                    expr.is_optional
                        && expr.default.is_none()
                        && !arguments.contains_key(&expr.name)
                }
                PatternPart::Literal(_) => false,
            })
    }

    /// Names of required placeholders with no value in `arguments`
    pub fn missing_placeholders(
        &self,
        pattern: &Pattern,
        arguments: &HashMap<String, String>,
    ) -> Vec<String> {
        pattern
            .placeholders()
            .into_iter()
            .filter(|expr| {
                !expr.is_optional && expr.default.is_none() && !arguments.contains_key(&expr.name)
            })
            .map(|expr| expr.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::parser::PatternParser;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_url_path_placeholder() {
        let pattern = PatternParser::parse("/users/{id}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("id", "a/b")]))
            .unwrap();
        assert_eq!(url, "/users/a%2Fb");
    }

    #[test]
    fn test_resolve_url_query_placeholder() {
        let pattern = PatternParser::parse("/search/{scope}?q={q}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("scope", "a b"), ("q", "a b/c")]))
            .unwrap();
        assert_eq!(url, "/search/a%20b?q=a+b%2Fc");
    }

    #[test]
    fn test_resolve_url_fragment_placeholder() {
        let pattern = PatternParser::parse("/docs#{section}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("section", "a b")]))
            .unwrap();
        assert_eq!(url, "/docs#a+b");
    }

    #[test]
    fn test_question_mark_inside_value_does_not_shift_position() {
        let pattern = PatternParser::parse("/{a}/{b}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("a", "x?y"), ("b", "p q")]))
            .unwrap();
        assert_eq!(url, "/x%3Fy/p%20q");
    }

    #[test]
    fn test_resolve_missing_placeholder() {
        let pattern = PatternParser::parse("/users/{id}").unwrap();
        let err = PatternResolver::new()
            .resolve_url(&pattern, &HashMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            RequestError::UnresolvedPlaceholder {
                name: "id".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_default_value() {
        let pattern = PatternParser::parse("/api/{version=v1}/users").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &HashMap::new())
            .unwrap();
        assert_eq!(url, "/api/v1/users");
    }

    #[test]
    fn test_resolve_empty_value_is_not_absent() {
        let pattern = PatternParser::parse("/api/{version=v1}/users").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("version", "")]))
            .unwrap();
        assert_eq!(url, "/api//users");
    }

    #[test]
    fn test_resolve_optional_absent() {
        let pattern = PatternParser::parse("/items?page={page?}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &HashMap::new())
            .unwrap();
        assert_eq!(url, "/items?page=");
    }

    #[test]
    fn test_resolve_noencode_pipeline() {
        let pattern = PatternParser::parse("/files/{path|!encode}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("path", "docs/readme.md")]))
            .unwrap();
        assert_eq!(url, "/files/docs/readme.md");
    }

    #[test]
    fn test_resolve_trim_then_positional_encoding() {
        let pattern = PatternParser::parse("/search?q={q|trim}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("q", "  hello world  ")]))
            .unwrap();
        assert_eq!(url, "/search?q=hello+world");
    }

    #[test]
    fn test_resolve_explicit_encode_in_query() {
        let pattern = PatternParser::parse("/search?q={q|encode}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("q", "hello world")]))
            .unwrap();
        assert_eq!(url, "/search?q=hello%20world");
    }

    #[test]
    fn test_resolve_literal_encoding() {
        let pattern = PatternParser::parse("Bearer {token}").unwrap();
        let value = PatternResolver::new()
            .resolve(&pattern, &args(&[("token", "a/b c")]), Encoding::Literal)
            .unwrap();
        assert_eq!(value, "Bearer a/b c");
    }

    #[test]
    fn test_trim_then_encode_in_path() {
        let pattern = PatternParser::parse("/tags/{tag|trim|encode}").unwrap();
        let url = PatternResolver::new()
            .resolve_url(&pattern, &args(&[("tag", "  a/b c ")]))
            .unwrap();
        assert_eq!(url, "/tags/a%2Fb%20c");
    }

    #[test]
    fn test_resolves_empty() {
        let resolver = PatternResolver::new();
        let optional = PatternParser::parse("{page?}").unwrap();
        assert!(resolver.resolves_empty(&optional, &HashMap::new()));
        assert!(!resolver.resolves_empty(&optional, &args(&[("page", "")])));

        let with_literal = PatternParser::parse("p{page?}").unwrap();
        assert!(!resolver.resolves_empty(&with_literal, &HashMap::new()));

        let defaulted = PatternParser::parse("{page=1}").unwrap();
        assert!(!resolver.resolves_empty(&defaulted, &HashMap::new()));
    }

    #[test]
    fn test_missing_placeholders() {
        let pattern = PatternParser::parse("/{org}/{repo}/{ref=main}/{path?}").unwrap();
        let missing =
            PatternResolver::new().missing_placeholders(&pattern, &args(&[("org", "rust")]));
        assert_eq!(missing, vec!["repo".to_string()]);
    }
}
