// Pattern module for request placeholders
//
// Parses URL, header and body patterns into literal and placeholder parts,
// and substitutes argument values with the encoding each position needs.

mod ast;
mod encoding;
mod parser;
mod resolver;

pub use ast::{Pattern, PatternPart, PipelineOp, PlaceholderExpr};
pub use encoding::{BodyEncoding, Encoding};
pub(crate) use encoding::form_encode;
pub use parser::PatternParser;
pub use resolver::PatternResolver;
