//! RDF text codecs for the Affinidi TDK JSON-LD tooling.
//!
//! Turtle and N-Quads are read into, and written from, one quad
//! [`Dataset`] model:
//! - [`turtle`]: parser and pretty-printing serializer (blank node inlining,
//!   prefix compaction, line wrapping)
//! - [`nquads`]: line-oriented codec with a sorted canonical form
//! - [`codec`]: the [`RdfParser`] / [`RdfRenderer`] contract and [`Format`]
//!   lookup by media type
//! - [`adapter`]: the boundary third-party RDF toolkits implement

pub mod adapter;
pub mod blank;
pub mod codec;
pub mod error;
pub mod escape;
pub mod model;
pub mod nquads;
pub mod prefix;
pub mod turtle;

pub use adapter::GraphAdapter;
pub use blank::BlankNodeTable;
pub use codec::{Format, RdfParser, RdfRenderer};
pub use error::{RdfError, Result};
pub use model::{
    BlankNode, DEFAULT_GRAPH_ID, Dataset, GraphLabel, Literal, NamedNode, Object, Quad, Subject,
    rdf, xsd,
};
pub use nquads::NQuadsCodec;
pub use prefix::PrefixTable;
pub use turtle::{TurtleCodec, TurtleOptions};
