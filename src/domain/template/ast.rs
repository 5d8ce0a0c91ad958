// Abstract Syntax Tree types for request patterns

/// A parsed pattern: literal text interleaved with placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub parts: Vec<PatternPart>,
}

impl Pattern {
    pub fn new(parts: Vec<PatternPart>) -> Self {
        Self { parts }
    }

    /// Get all placeholders in this pattern, in order of appearance
    pub fn placeholders(&self) -> Vec<&PlaceholderExpr> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PatternPart::Placeholder(expr) => Some(expr),
                _ => None,
            })
            .collect()
    }

    pub fn is_literal(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, PatternPart::Literal(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternPart {
    Literal(String),
    Placeholder(PlaceholderExpr),
}

/// A placeholder with optional modifiers and pipeline operations
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderExpr {
    pub name: String,
    pub is_optional: bool,
    pub default: Option<String>,
    pub pipelines: Vec<PipelineOp>,
}

impl PlaceholderExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_optional: false,
            default: None,
            pipelines: Vec::new(),
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.is_optional = optional;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_pipelines(mut self, pipelines: Vec<PipelineOp>) -> Self {
        self.pipelines = pipelines;
        self
    }

    /// True when the value's encoding is chosen by a pipeline rather than its position
    pub fn overrides_encoding(&self) -> bool {
        self.pipelines
            .iter()
            .any(|p| matches!(p, PipelineOp::Encode | PipelineOp::NoEncode))
    }
}

/// Pipeline operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOp {
    Encode,
    NoEncode,
    Trim,
}
