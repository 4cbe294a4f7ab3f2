//! Boundary for third-party RDF toolkits.
//!
//! An adapter maps a toolkit's native graph model to and from [`Dataset`].
//! Blank nodes are relabelled on import through a
//! [`BlankNodeTable`](crate::blank::BlankNodeTable) keyed by whatever stable
//! identity the native model exposes (never memory addresses), one table per
//! import call.

use crate::error::Result;
use crate::model::Dataset;

pub trait GraphAdapter {
    /// The toolkit's own graph type.
    type Graph;

    /// Convert a native graph. Implementations create a fresh
    /// `BlankNodeTable::for_import()` per call.
    fn import(&self, graph: &Self::Graph) -> Result<Dataset>;

    fn export(&self, dataset: &Dataset) -> Result<Self::Graph>;
}
