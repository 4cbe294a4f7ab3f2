use std::collections::HashMap;

use affinidi_rdf_syntax::model::*;
use affinidi_rdf_syntax::{BlankNodeTable, GraphAdapter, RdfError, Result, nquads, turtle};

/// A stand-in for a third-party toolkit: triples only, anonymous nodes
/// identified by a numeric handle.
#[derive(Clone, Debug, PartialEq)]
enum Term {
    Iri(String),
    Anon(u32),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
struct NativeGraph {
    triples: Vec<(Term, String, Term)>,
}

struct ToyAdapter;

impl GraphAdapter for ToyAdapter {
    type Graph = NativeGraph;

    fn import(&self, graph: &NativeGraph) -> Result<Dataset> {
        let mut blanks = BlankNodeTable::for_import();
        let mut ds = Dataset::new();
        for (s, p, o) in &graph.triples {
            let subject: Subject = match s {
                Term::Iri(iri) => NamedNode::new(iri.as_str()).into(),
                Term::Anon(handle) => blanks.label_for(&handle.to_string()).into(),
                Term::Text(_) => {
                    return Err(RdfError::adapter("literal in subject position"));
                }
            };
            let object: Object = match o {
                Term::Iri(iri) => NamedNode::new(iri.as_str()).into(),
                Term::Anon(handle) => blanks.label_for(&handle.to_string()).into(),
                Term::Text(text) => Literal::new(text.as_str()).into(),
            };
            ds.add_triple(subject, NamedNode::new(p.as_str()), object);
        }
        Ok(ds)
    }

    fn export(&self, dataset: &Dataset) -> Result<NativeGraph> {
        let mut handles: HashMap<String, u32> = HashMap::new();
        let mut handle_for = |id: &str| -> u32 {
            let next = handles.len() as u32;
            *handles.entry(id.to_string()).or_insert(next)
        };
        let mut graph = NativeGraph::default();
        for quad in dataset.get_quads(&GraphLabel::Default) {
            let s = match &quad.subject {
                Subject::Named(n) => Term::Iri(n.iri.clone()),
                Subject::Blank(b) => Term::Anon(handle_for(&b.id)),
            };
            let o = match &quad.object {
                Object::Named(n) => Term::Iri(n.iri.clone()),
                Object::Blank(b) => Term::Anon(handle_for(&b.id)),
                Object::Literal(lit) if lit.is_plain() => Term::Text(lit.value.clone()),
                Object::Literal(lit) => {
                    return Err(RdfError::adapter(format!(
                        "toolkit cannot hold typed literal {lit}"
                    )));
                }
            };
            graph.triples.push((s, quad.predicate.iri.clone(), o));
        }
        Ok(graph)
    }
}

fn native_person() -> NativeGraph {
    let iri = |s: &str| Term::Iri(s.to_string());
    NativeGraph {
        triples: vec![
            (iri("http://a/alice"), "http://a/address".into(), Term::Anon(42)),
            (Term::Anon(42), "http://a/city".into(), Term::Text("Paris".into())),
            (Term::Anon(42), "http://a/geo".into(), Term::Anon(7)),
            (Term::Anon(7), "http://a/lat".into(), Term::Text("48.85".into())),
        ],
    }
}

#[test]
fn same_native_node_gets_same_label() {
    let ds = ToyAdapter.import(&native_person()).unwrap();
    let quads: Vec<&Quad> = ds.quads().collect();
    assert_eq!(quads[0].object, Object::Blank(BlankNode::new("t0")));
    assert_eq!(quads[1].subject, Subject::Blank(BlankNode::new("t0")));
    assert_eq!(quads[2].subject, Subject::Blank(BlankNode::new("t0")));
    assert_eq!(quads[2].object, Object::Blank(BlankNode::new("t1")));
    assert_eq!(quads[3].subject, Subject::Blank(BlankNode::new("t1")));
}

#[test]
fn each_import_starts_a_fresh_table() {
    let first = ToyAdapter.import(&native_person()).unwrap();
    let second = ToyAdapter.import(&native_person()).unwrap();
    assert_eq!(
        nquads::serialize_canonical(&first),
        nquads::serialize_canonical(&second)
    );
}

#[test]
fn export_then_import_preserves_structure() {
    let ds = ToyAdapter.import(&native_person()).unwrap();
    let native = ToyAdapter.export(&ds).unwrap();
    assert_eq!(native.triples.len(), 4);
    let back = ToyAdapter.import(&native).unwrap();
    assert_eq!(
        nquads::serialize_canonical(&ds),
        nquads::serialize_canonical(&back)
    );
}

#[test]
fn imported_graph_renders_as_nested_turtle() {
    let ds = ToyAdapter.import(&native_person()).unwrap();
    let out = turtle::serialize(&ds, None);
    assert!(!out.contains("_:t"));
    assert!(out.starts_with("<http://a/alice> <http://a/address> ["));
    assert_eq!(turtle::parse(&out).unwrap().len(), 4);
}

#[test]
fn adapter_failures_surface_as_adapter_errors() {
    let bad = NativeGraph {
        triples: vec![(Term::Text("x".into()), "http://a/p".into(), Term::Anon(1))],
    };
    assert!(matches!(
        ToyAdapter.import(&bad),
        Err(RdfError::AdapterError(_))
    ));

    let mut ds = Dataset::new();
    ds.add_triple(
        NamedNode::new("http://a/s"),
        NamedNode::new("http://a/n"),
        Literal::typed("1", NamedNode::new(xsd::INTEGER)),
    );
    let err = ToyAdapter.export(&ds).unwrap_err();
    assert!(err.to_string().contains("typed literal"));
}
