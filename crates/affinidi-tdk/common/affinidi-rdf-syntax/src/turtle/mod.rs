//! Turtle reader and writer.
//!
//! The reader covers the subset the writer produces plus hand-written
//! documents in the same style: `@prefix` declarations at the top, IRIs,
//! prefixed names, blank node labels, `[ ... ]` property lists, empty `[]`
//! nodes (written on one line), the `a` keyword, quoted literals with
//! `@lang` or `^^datatype`, and the `,` `;` `.` separators.

pub mod parser;
pub mod serializer;

pub use parser::{parse, parse_bytes};
pub use serializer::{TurtleOptions, serialize, serialize_with_options};

use crate::codec::{RdfParser, RdfRenderer};
use crate::error::Result;
use crate::model::Dataset;
use crate::prefix::PrefixTable;

/// Turtle as an [`RdfParser`] / [`RdfRenderer`] pair.
#[derive(Clone, Debug, Default)]
pub struct TurtleCodec {
    pub options: TurtleOptions,
}

impl TurtleCodec {
    pub fn new(options: TurtleOptions) -> Self {
        Self { options }
    }
}

impl RdfParser for TurtleCodec {
    fn parse(&self, input: &str) -> Result<Dataset> {
        parser::parse(input)
    }
}

impl RdfRenderer for TurtleCodec {
    fn render(&self, dataset: &Dataset, prefixes: Option<&PrefixTable>) -> String {
        serializer::serialize_with_options(dataset, prefixes, &self.options)
    }
}
