pub mod parser;
pub mod serializer;

pub use parser::{parse, parse_bytes};
pub use serializer::{serialize_canonical, serialize_dataset, serialize_quad, serialize_quads};

use crate::codec::{RdfParser, RdfRenderer};
use crate::error::Result;
use crate::model::Dataset;
use crate::prefix::PrefixTable;

/// N-Quads as an [`RdfParser`] / [`RdfRenderer`] pair. Renders in insertion
/// order unless built with [`NQuadsCodec::canonical`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NQuadsCodec {
    pub canonical: bool,
}

impl NQuadsCodec {
    /// A codec whose output lines are sorted.
    pub fn canonical() -> Self {
        Self { canonical: true }
    }
}

impl RdfParser for NQuadsCodec {
    fn parse(&self, input: &str) -> Result<Dataset> {
        parser::parse(input)
    }
}

impl RdfRenderer for NQuadsCodec {
    fn render(&self, dataset: &Dataset, _prefixes: Option<&PrefixTable>) -> String {
        if self.canonical {
            serialize_canonical(dataset)
        } else {
            serialize_dataset(dataset)
        }
    }
}
