// Pattern parser using recursive descent

use super::ast::{Pattern, PatternPart, PipelineOp, PlaceholderExpr};
use crate::error::RequestError;

type Result<T> = std::result::Result<T, RequestError>;

pub struct PatternParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PatternParser<'a> {
    pub fn parse(pattern: &'a str) -> Result<Pattern> {
        let mut parser = Self {
            input: pattern,
            pos: 0,
        };
        parser.parse_pattern()
    }

    fn parse_pattern(&mut self) -> Result<Pattern> {
        let mut parts = Vec::new();
        let mut literal_buf = String::new();

        while self.pos < self.input.len() {
            if self.peek_char() == Some('{') {
                if self.peek_ahead(1) == Some('{') {
                    // Escaped brace
                    self.pos += 2;
                    literal_buf.push('{');
                } else {
                    if !literal_buf.is_empty() {
                        parts.push(PatternPart::Literal(std::mem::take(&mut literal_buf)));
                    }
                    let expr = self.parse_placeholder()?;
                    parts.push(PatternPart::Placeholder(expr));
                }
            } else if self.peek_char() == Some('}') {
                if self.peek_ahead(1) == Some('}') {
                    self.pos += 2;
                    literal_buf.push('}');
                } else {
                    return Err(self.error("unexpected closing brace"));
                }
            } else {
                literal_buf.push(self.consume_char()?);
            }
        }

        if !literal_buf.is_empty() {
            parts.push(PatternPart::Literal(literal_buf));
        }

        Ok(Pattern::new(parts))
    }

    fn parse_placeholder(&mut self) -> Result<PlaceholderExpr> {
        let open = self.pos;
        self.expect_char('{')?;
        self.skip_whitespace();

        let name = self.parse_name()?;
        if name.is_empty() {
            return Err(RequestError::malformed(
                self.input,
                open,
                "empty placeholder name",
            ));
        }
        self.skip_whitespace();

        let mut expr = PlaceholderExpr::new(name);

        if self.peek_char() == Some('?') {
            self.consume_char()?;
            expr = expr.with_optional(true);
            self.skip_whitespace();
        } else if self.peek_char() == Some('=') {
            self.consume_char()?;
            expr = expr.with_default(self.parse_default_value());
        }

        let pipelines = self.parse_pipelines()?;
        self.skip_whitespace();

        match self.peek_char() {
            Some('}') => {
                self.consume_char()?;
            }
            Some(ch) => {
                return Err(self.error(format!("expected '}}' but found '{}'", ch)));
            }
            None => {
                return Err(RequestError::malformed(
                    self.input,
                    open,
                    "unclosed placeholder",
                ));
            }
        }

        Ok(expr.with_pipelines(pipelines))
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.' {
                name.push(self.consume_char()?);
            } else if ch == '?' || ch == '=' || ch == '|' || ch == '}' || ch.is_whitespace() {
                break;
            } else {
                return Err(self.error(format!("invalid character '{}' in placeholder name", ch)));
            }
        }

        Ok(name)
    }

    fn parse_default_value(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch == '}' || ch == '|' || ch == '{' {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.input[start..self.pos].trim().to_string()
    }

    fn parse_pipelines(&mut self) -> Result<Vec<PipelineOp>> {
        let mut pipelines = Vec::new();

        while self.peek_char() == Some('|') {
            self.consume_char()?;
            self.skip_whitespace();
            pipelines.push(self.parse_pipeline_op()?);
            self.skip_whitespace();
        }

        Ok(pipelines)
    }

    fn parse_pipeline_op(&mut self) -> Result<PipelineOp> {
        let negated = if self.peek_char() == Some('!') {
            self.consume_char()?;
            true
        } else {
            false
        };

        let start = self.pos;
        let op_name = self.parse_identifier()?;

        match (op_name.as_str(), negated) {
            ("encode", false) => Ok(PipelineOp::Encode),
            ("encode", true) => Ok(PipelineOp::NoEncode),
            ("trim", false) => Ok(PipelineOp::Trim),
            ("trim", true) => Err(RequestError::malformed(
                self.input,
                start,
                "cannot negate 'trim' operation",
            )),
            (name, _) => Err(RequestError::malformed(
                self.input,
                start,
                format!("unknown pipeline operation '{}'", name),
            )),
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let mut ident = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(self.consume_char()?);
            } else {
                break;
            }
        }

        if ident.is_empty() {
            return Err(self.error("expected pipeline operation"));
        }

        Ok(ident)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn consume_char(&mut self) -> Result<char> {
        let ch = self
            .peek_char()
            .ok_or_else(|| self.error("unexpected end of pattern"))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.consume_char()?;
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{}' but found '{}'", expected, ch))),
            None => Err(self.error(format!("expected '{}' but found end of pattern", expected))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> RequestError {
        RequestError::malformed(self.input, self.pos, reason)
    }
}
