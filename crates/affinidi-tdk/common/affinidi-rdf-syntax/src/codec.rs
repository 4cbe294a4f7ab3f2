use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RdfError, Result};
use crate::model::Dataset;
use crate::nquads::NQuadsCodec;
use crate::prefix::PrefixTable;
use crate::turtle::TurtleCodec;

/// Text → dataset. Each call builds a fresh dataset and owns its parse
/// state, so one codec value can serve many inputs.
pub trait RdfParser {
    fn parse(&self, input: &str) -> Result<Dataset>;

    /// Parse raw bytes, failing with [`RdfError::InvalidInput`] when they are
    /// not UTF-8.
    fn parse_bytes(&self, input: &[u8]) -> Result<Dataset> {
        self.parse(text_input(input)?)
    }
}

/// Dataset → text.
pub trait RdfRenderer {
    /// `prefixes` is an optional hint for syntaxes that compact IRIs; others
    /// ignore it.
    fn render(&self, dataset: &Dataset, prefixes: Option<&PrefixTable>) -> String;
}

/// Check that `input` is text.
pub fn text_input(input: &[u8]) -> Result<&str> {
    std::str::from_utf8(input)
        .map_err(|e| RdfError::invalid_input(format!("input is not UTF-8 text: {e}")))
}

/// The RDF text syntaxes this crate reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Turtle,
    NQuads,
}

impl Format {
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::NQuads => "application/n-quads",
        }
    }

    /// Look a format up by media type. Parameters such as `;charset=utf-8`
    /// are ignored, as is case.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/turtle" | "application/x-turtle" => Some(Self::Turtle),
            "application/n-quads" | "text/x-nquads" => Some(Self::NQuads),
            _ => None,
        }
    }

    pub fn parse(self, input: &str) -> Result<Dataset> {
        match self {
            Self::Turtle => TurtleCodec::default().parse(input),
            Self::NQuads => NQuadsCodec::default().parse(input),
        }
    }

    pub fn render(self, dataset: &Dataset, prefixes: Option<&PrefixTable>) -> String {
        match self {
            Self::Turtle => TurtleCodec::default().render(dataset, prefixes),
            Self::NQuads => NQuadsCodec::default().render(dataset, prefixes),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}
