use crate::escape::escape_literal;
use crate::model::{Dataset, GraphLabel, Object, Quad, Subject};

/// Serialize a single quad to an N-Quads line (without trailing newline).
pub fn serialize_quad(quad: &Quad) -> String {
    let mut out = String::with_capacity(128);

    match &quad.subject {
        Subject::Named(n) => push_iri(&mut out, &n.iri),
        Subject::Blank(b) => push_blank(&mut out, &b.id),
    }
    out.push(' ');

    push_iri(&mut out, &quad.predicate.iri);
    out.push(' ');

    match &quad.object {
        Object::Named(n) => push_iri(&mut out, &n.iri),
        Object::Blank(b) => push_blank(&mut out, &b.id),
        Object::Literal(lit) => {
            out.push('"');
            out.push_str(&escape_literal(&lit.value));
            out.push('"');
            if let Some(ref lang) = lit.language {
                out.push('@');
                out.push_str(lang);
            } else if !lit.is_plain() {
                out.push_str("^^");
                push_iri(&mut out, &lit.datatype.iri);
            }
        }
    }
    out.push(' ');

    match &quad.graph {
        GraphLabel::Named(n) => {
            push_iri(&mut out, &n.iri);
            out.push(' ');
        }
        GraphLabel::Blank(b) => {
            push_blank(&mut out, &b.id);
            out.push(' ');
        }
        GraphLabel::Default => {}
    }

    out.push('.');
    out
}

fn push_iri(out: &mut String, iri: &str) {
    out.push('<');
    out.push_str(iri);
    out.push('>');
}

fn push_blank(out: &mut String, id: &str) {
    out.push_str("_:");
    out.push_str(id);
}

/// Serialize quads to N-Quads, one newline-terminated line per quad, in the
/// order given.
pub fn serialize_quads<'a>(quads: impl IntoIterator<Item = &'a Quad>) -> String {
    let mut out = String::new();
    for q in quads {
        out.push_str(&serialize_quad(q));
        out.push('\n');
    }
    out
}

/// Serialize a dataset to N-Quads in insertion order.
pub fn serialize_dataset(dataset: &Dataset) -> String {
    serialize_quads(dataset.quads())
}

/// Serialize a dataset to canonical N-Quads: lines sorted lexicographically.
///
/// Any permutation of the same quads yields the same text.
pub fn serialize_canonical(dataset: &Dataset) -> String {
    let mut lines: Vec<String> = dataset
        .quads()
        .map(|q| {
            let mut line = serialize_quad(q);
            line.push('\n');
            line
        })
        .collect();
    lines.sort();
    tracing::debug!(quads = lines.len(), "serialized canonical N-Quads");
    lines.join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    #[test]
    fn serialize_named_nodes() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            NamedNode::new("http://example.org/o"),
            GraphLabel::Default,
        );
        assert_eq!(
            serialize_quad(&q),
            "<http://example.org/s> <http://example.org/p> <http://example.org/o> ."
        );
    }

    #[test]
    fn serialize_blank_node_subject() {
        let q = Quad::new(
            BlankNode::new("b0"),
            NamedNode::new("http://example.org/p"),
            NamedNode::new("http://example.org/o"),
            GraphLabel::Default,
        );
        assert_eq!(
            serialize_quad(&q),
            "_:b0 <http://example.org/p> <http://example.org/o> ."
        );
    }

    #[test]
    fn serialize_typed_literal() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            Literal::typed("42", NamedNode::new(xsd::INTEGER)),
            GraphLabel::Default,
        );
        assert_eq!(
            serialize_quad(&q),
            "<http://example.org/s> <http://example.org/p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        );
    }

    #[test]
    fn serialize_string_literal_omits_datatype() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            Literal::typed("x", NamedNode::new(xsd::STRING)),
            GraphLabel::Default,
        );
        assert!(serialize_quad(&q).ends_with("\"x\" ."));
    }

    #[test]
    fn serialize_lang_literal() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            Literal::lang("bonjour", "fr"),
            GraphLabel::Default,
        );
        assert_eq!(
            serialize_quad(&q),
            "<http://example.org/s> <http://example.org/p> \"bonjour\"@fr ."
        );
    }

    #[test]
    fn serialize_with_named_graph() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            NamedNode::new("http://example.org/o"),
            GraphLabel::Named(NamedNode::new("http://example.org/g")),
        );
        assert_eq!(
            serialize_quad(&q),
            "<http://example.org/s> <http://example.org/p> <http://example.org/o> <http://example.org/g> ."
        );
    }

    #[test]
    fn serialize_escaped_literal() {
        let q = Quad::new(
            NamedNode::new("http://example.org/s"),
            NamedNode::new("http://example.org/p"),
            Literal::new("line1\nline2\t\"quoted\"\r\\"),
            GraphLabel::Default,
        );
        assert_eq!(
            serialize_quad(&q),
            "<http://example.org/s> <http://example.org/p> \"line1\\nline2\\t\\\"quoted\\\"\\r\\\\\" ."
        );
    }

    #[test]
    fn canonical_output_is_sorted() {
        let mut ds = Dataset::new();
        for s in ["c", "a", "b"] {
            ds.add_triple(
                NamedNode::new(format!("http://example.org/{s}")),
                NamedNode::new("http://example.org/p"),
                Literal::new(s),
            );
        }
        let lines: Vec<_> = serialize_canonical(&ds).lines().map(str::to_owned).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
        assert!(lines[0].starts_with("<http://example.org/a>"));
    }
}
