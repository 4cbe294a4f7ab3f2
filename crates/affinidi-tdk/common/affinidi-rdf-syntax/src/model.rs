use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::escape::escape_literal;
use crate::prefix::PrefixTable;

/// Graph id of the default graph.
pub const DEFAULT_GRAPH_ID: &str = "@default";

/// An IRI-identified RDF node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode {
    pub iri: String,
}

impl NamedNode {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// A blank (anonymous) RDF node. The `id` field stores the label without the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    pub id: String,
}

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

/// An RDF literal value with datatype and optional language tag.
///
/// The datatype is always resolved: plain literals carry `xsd:string` and
/// language-tagged literals carry `rdf:langString`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: NamedNode,
    pub language: Option<String>,
}

impl Literal {
    /// Create a plain string literal (xsd:string).
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: NamedNode::new(xsd::STRING),
            language: None,
        }
    }

    /// Create a typed literal.
    pub fn typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// Create a language-tagged literal (rdf:langString).
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: NamedNode::new(rdf::LANG_STRING),
            language: Some(language.into()),
        }
    }

    /// Build a literal from optional parts, applying the defaulting rules.
    ///
    /// A language tag wins over an explicit datatype: the datatype is
    /// replaced by `rdf:langString`.
    pub fn from_parts(
        value: impl Into<String>,
        datatype: Option<&str>,
        language: Option<&str>,
    ) -> Self {
        match (language, datatype) {
            (Some(lang), dt) => {
                if let Some(dt) = dt
                    && dt != rdf::LANG_STRING
                    && dt != xsd::STRING
                {
                    tracing::warn!(
                        language = %lang,
                        datatype = %dt,
                        "literal has both a language and a datatype; keeping the language"
                    );
                }
                Self::lang(value, lang)
            }
            (None, Some(dt)) => Self::typed(value, NamedNode::new(dt)),
            (None, None) => Self::new(value),
        }
    }

    /// True when the literal needs no datatype or language suffix.
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.iri == xsd::STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal(&self.value))?;
        if let Some(ref lang) = self.language {
            write!(f, "@{lang}")
        } else if self.datatype.iri != xsd::STRING {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

/// The subject of an RDF quad.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    Named(NamedNode),
    Blank(BlankNode),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
        }
    }
}

impl From<NamedNode> for Subject {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Subject {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

/// The object of an RDF quad.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Object {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}

impl From<NamedNode> for Object {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Object {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<Subject> for Object {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Named(n) => Self::Named(n),
            Subject::Blank(b) => Self::Blank(b),
        }
    }
}

/// The graph label of an RDF quad.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphLabel {
    Named(NamedNode),
    Blank(BlankNode),
    Default,
}

impl GraphLabel {
    /// Map a graph id to a label: `@default` is the default graph, `_:x` a
    /// blank graph label, anything else a named graph.
    pub fn from_id(id: &str) -> Self {
        if id == DEFAULT_GRAPH_ID {
            Self::Default
        } else if let Some(label) = id.strip_prefix("_:") {
            Self::Blank(BlankNode::new(label))
        } else {
            Self::Named(NamedNode::new(id))
        }
    }

    /// The graph id: `@default`, `_:label` or the graph IRI.
    pub fn id(&self) -> String {
        match self {
            Self::Named(n) => n.iri.clone(),
            Self::Blank(b) => b.to_string(),
            Self::Default => DEFAULT_GRAPH_ID.to_string(),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for GraphLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
            Self::Default => Ok(()),
        }
    }
}

/// An RDF quad (subject, predicate, object, graph).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Subject,
    pub predicate: NamedNode,
    pub object: Object,
    pub graph: GraphLabel,
}

impl Quad {
    pub fn new(
        subject: impl Into<Subject>,
        predicate: NamedNode,
        object: impl Into<Object>,
        graph: GraphLabel,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph,
        }
    }
}

/// Quads grouped by graph, in insertion order, plus the namespace prefixes
/// known for them.
///
/// Duplicate quads are kept.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    graphs: IndexMap<GraphLabel, Vec<Quad>>,
    namespaces: PrefixTable,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quad to the graph it names.
    pub fn add(&mut self, quad: Quad) {
        self.graphs
            .entry(quad.graph.clone())
            .or_default()
            .push(quad);
    }

    /// Append a triple to the default graph.
    pub fn add_triple(
        &mut self,
        subject: impl Into<Subject>,
        predicate: NamedNode,
        object: impl Into<Object>,
    ) {
        self.add(Quad::new(subject, predicate, object, GraphLabel::Default));
    }

    pub fn add_quad(
        &mut self,
        subject: impl Into<Subject>,
        predicate: NamedNode,
        object: impl Into<Object>,
        graph: GraphLabel,
    ) {
        self.add(Quad::new(subject, predicate, object, graph));
    }

    /// Append a literal-valued statement built from its parts.
    pub fn add_literal(
        &mut self,
        subject: impl Into<Subject>,
        predicate: NamedNode,
        value: impl Into<String>,
        datatype: Option<&str>,
        language: Option<&str>,
        graph: GraphLabel,
    ) {
        let literal = Literal::from_parts(value, datatype, language);
        self.add(Quad::new(subject, predicate, literal, graph));
    }

    pub fn set_namespace(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.namespaces.insert(prefix, iri);
    }

    pub fn namespaces(&self) -> &PrefixTable {
        &self.namespaces
    }

    /// Graph labels in first-insertion order.
    pub fn graph_names(&self) -> impl Iterator<Item = &GraphLabel> {
        self.graphs.keys()
    }

    /// Quads of one graph. Unknown graphs yield an empty slice.
    pub fn get_quads(&self, graph: &GraphLabel) -> &[Quad] {
        self.graphs.get(graph).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All quads, graph by graph.
    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.graphs.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.graphs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the set of all blank node IDs in this dataset.
    pub fn blank_nodes(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for q in self.quads() {
            if let Subject::Blank(b) = &q.subject {
                ids.insert(b.id.clone());
            }
            if let Object::Blank(b) = &q.object {
                ids.insert(b.id.clone());
            }
            if let GraphLabel::Blank(b) = &q.graph {
                ids.insert(b.id.clone());
            }
        }
        ids
    }
}

impl Extend<Quad> for Dataset {
    fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
        for quad in iter {
            self.add(quad);
        }
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        let mut ds = Self::new();
        ds.extend(iter);
        ds
    }
}

/// XSD namespace constants.
pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// RDF namespace constants.
pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}
