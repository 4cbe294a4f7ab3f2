use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::blank::{BlankNodeTable, is_turtle_label};
use crate::escape::escape_literal;
use crate::model::*;
use crate::prefix::PrefixTable;

/// Layout settings for [`serialize`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleOptions {
    /// Objects are moved to a new line rather than run past this column.
    pub max_line_length: usize,
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for TurtleOptions {
    fn default() -> Self {
        Self {
            max_line_length: 80,
            indent_width: 4,
        }
    }
}

/// Serialize the default graph of a dataset to Turtle with default options.
///
/// IRIs are compacted against the dataset's namespaces followed by
/// `prefixes`; only prefixes that end up used get an `@prefix` line.
pub fn serialize(dataset: &Dataset, prefixes: Option<&PrefixTable>) -> String {
    serialize_with_options(dataset, prefixes, &TurtleOptions::default())
}

pub fn serialize_with_options(
    dataset: &Dataset,
    prefixes: Option<&PrefixTable>,
    options: &TurtleOptions,
) -> String {
    for graph in dataset.graph_names().filter(|g| !g.is_default()) {
        tracing::warn!(
            graph = %graph.id(),
            quads = dataset.get_quads(graph).len(),
            "Turtle output holds the default graph only; skipping named graph"
        );
    }

    let mut table = dataset.namespaces().clone();
    if let Some(extra) = prefixes {
        table.merge(extra);
    }

    let grouped = Grouping::build(dataset.get_quads(&GraphLabel::Default));
    let inlined = grouped.inline_candidates();
    tracing::debug!(
        subjects = grouped.subjects.len(),
        inlined = inlined.len(),
        "grouped quads for Turtle output"
    );

    let mut terms = TermWriter::new(&table, dataset.blank_nodes());
    let blocks: Vec<SubjectNode> = grouped
        .subjects
        .keys()
        .filter(|s| !matches!(s, Subject::Blank(b) if inlined.contains(b.id.as_str())))
        .map(|s| grouped.subject_node(s, &inlined, &mut terms))
        .collect();

    let mut writer = Writer::new(options);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            writer.push("\n");
        }
        writer.write_block(block);
        writer.push("\n");
    }

    let mut out = String::new();
    let mut any_prefix = false;
    for (prefix, namespace) in table.iter() {
        if terms.used.contains(prefix) {
            out.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
            any_prefix = true;
        }
    }
    if any_prefix {
        out.push('\n');
    }
    out.push_str(&writer.out);
    out
}

/// Quads of one graph grouped subject → predicate → objects, keeping
/// first-seen order at every level.
struct Grouping<'d> {
    subjects: IndexMap<&'d Subject, IndexMap<&'d NamedNode, Vec<&'d Object>>>,
    /// Blank node id → subjects referencing it as an object, one entry per
    /// reference.
    referrers: HashMap<&'d str, Vec<&'d Subject>>,
}

impl<'d> Grouping<'d> {
    fn build(quads: &'d [Quad]) -> Self {
        let mut subjects: IndexMap<&Subject, IndexMap<&NamedNode, Vec<&Object>>> =
            IndexMap::new();
        let mut referrers: HashMap<&str, Vec<&Subject>> = HashMap::new();
        for quad in quads {
            subjects
                .entry(&quad.subject)
                .or_default()
                .entry(&quad.predicate)
                .or_default()
                .push(&quad.object);
            if let Object::Blank(b) = &quad.object {
                referrers.entry(b.id.as_str()).or_default().push(&quad.subject);
            }
        }
        Self {
            subjects,
            referrers,
        }
    }

    /// Blank nodes that can be written as a nested `[ ... ]` at their one
    /// reference site.
    fn inline_candidates(&self) -> HashSet<&'d str> {
        let mut inline: HashSet<&str> = self
            .subjects
            .keys()
            .filter_map(|&s| match s {
                Subject::Blank(b) => Some(b.id.as_str()),
                Subject::Named(_) => None,
            })
            .filter(|id| self.referrers.get(id).is_some_and(|r| r.len() == 1))
            .collect();

        // A chain of once-referenced blank nodes that loops back on itself
        // has no top-level anchor; keep the node closing the loop top-level.
        loop {
            let mut broken = None;
            'candidates: for id in self.ordered(&inline) {
                let mut seen = HashSet::from([id]);
                let mut current = id;
                while let Some(Subject::Blank(parent)) = self.single_referrer(current) {
                    let parent = parent.id.as_str();
                    if !inline.contains(parent) {
                        break;
                    }
                    if !seen.insert(parent) {
                        broken = Some(parent);
                        break 'candidates;
                    }
                    current = parent;
                }
            }
            match broken {
                Some(id) => {
                    tracing::trace!(blank_node = %id, "blank node cycle, not inlining");
                    inline.remove(id);
                }
                None => break,
            }
        }
        inline
    }

    fn single_referrer(&self, id: &str) -> Option<&'d Subject> {
        match self.referrers.get(id).map(Vec::as_slice) {
            Some([one]) => Some(*one),
            _ => None,
        }
    }

    /// Members of `set` in subject order, for deterministic cycle breaking.
    fn ordered(&self, set: &HashSet<&'d str>) -> Vec<&'d str> {
        self.subjects
            .keys()
            .filter_map(|&s| match s {
                Subject::Blank(b) if set.contains(b.id.as_str()) => Some(b.id.as_str()),
                _ => None,
            })
            .collect()
    }

    fn subject_node(
        &self,
        subject: &Subject,
        inlined: &HashSet<&str>,
        terms: &mut TermWriter<'_>,
    ) -> SubjectNode {
        let label = match subject {
            Subject::Named(n) => Some(terms.iri(&n.iri)),
            Subject::Blank(b) => self
                .referrers
                .get(b.id.as_str())
                .map(|_| terms.blank(b)),
        };
        SubjectNode {
            label,
            predicates: self.predicate_nodes(subject, inlined, terms),
        }
    }

    fn predicate_nodes(
        &self,
        subject: &Subject,
        inlined: &HashSet<&str>,
        terms: &mut TermWriter<'_>,
    ) -> Vec<PredicateNode> {
        let Some(predicates) = self.subjects.get(subject) else {
            return Vec::new();
        };
        predicates
            .iter()
            .map(|(predicate, objects)| PredicateNode {
                predicate: if predicate.iri == rdf::TYPE {
                    "a".to_string()
                } else {
                    terms.iri(&predicate.iri)
                },
                objects: objects
                    .iter()
                    .map(|object| self.object_node(object, inlined, terms))
                    .collect(),
            })
            .collect()
    }

    fn object_node(
        &self,
        object: &Object,
        inlined: &HashSet<&str>,
        terms: &mut TermWriter<'_>,
    ) -> ObjectNode {
        match object {
            Object::Named(n) => ObjectNode::Leaf(terms.iri(&n.iri)),
            Object::Literal(l) => ObjectNode::Leaf(terms.literal(l)),
            Object::Blank(b) if inlined.contains(b.id.as_str()) => {
                let subject = Subject::Blank(b.clone());
                ObjectNode::Nested(self.predicate_nodes(&subject, inlined, terms))
            }
            Object::Blank(b) => ObjectNode::Leaf(terms.blank(b)),
        }
    }
}

/// A top-level statement block. `label` is `None` for a blank node nothing
/// refers to, which is written as `[ ... ] .`.
struct SubjectNode {
    label: Option<String>,
    predicates: Vec<PredicateNode>,
}

struct PredicateNode {
    predicate: String,
    objects: Vec<ObjectNode>,
}

enum ObjectNode {
    Leaf(String),
    Nested(Vec<PredicateNode>),
}

/// Renders terms, compacting IRIs and recording which prefixes were used.
/// Blank labels Turtle cannot read back are replaced by fresh ones that no
/// label in `taken` uses.
struct TermWriter<'t> {
    table: &'t PrefixTable,
    used: HashSet<String>,
    taken: HashSet<String>,
    relabels: BlankNodeTable,
}

impl<'t> TermWriter<'t> {
    fn new(table: &'t PrefixTable, taken: HashSet<String>) -> Self {
        Self {
            table,
            used: HashSet::new(),
            taken,
            relabels: BlankNodeTable::new("b", 1),
        }
    }

    fn blank(&mut self, node: &BlankNode) -> String {
        if is_turtle_label(&node.id) {
            return node.to_string();
        }
        let label = self.relabels.label_avoiding(&node.id, &self.taken);
        tracing::trace!(blank_node = %node.id, label = %label.id, "relabelled blank node for Turtle");
        label.to_string()
    }

    fn iri(&mut self, iri: &str) -> String {
        match self.table.compact(iri) {
            Some((prefix, local)) => {
                self.used.insert(prefix.to_string());
                format!("{prefix}:{local}")
            }
            None => format!("<{iri}>"),
        }
    }

    fn literal(&mut self, literal: &Literal) -> String {
        let mut out = format!("\"{}\"", escape_literal(&literal.value));
        if let Some(lang) = &literal.language {
            out.push('@');
            out.push_str(lang);
        } else if !literal.is_plain() {
            out.push_str("^^");
            out.push_str(&self.iri(&literal.datatype.iri));
        }
        out
    }
}

/// Output buffer that tracks the current column.
struct Writer<'o> {
    out: String,
    column: usize,
    options: &'o TurtleOptions,
}

impl<'o> Writer<'o> {
    fn new(options: &'o TurtleOptions) -> Self {
        Self {
            out: String::new(),
            column: 0,
            options,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
        match text.rfind('\n') {
            Some(i) => self.column = text[i + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
    }

    fn newline(&mut self, depth: usize) {
        self.push("\n");
        self.push(&" ".repeat(depth * self.options.indent_width));
    }

    fn write_block(&mut self, block: &SubjectNode) {
        match &block.label {
            Some(label) => {
                self.push(label);
                self.push(" ");
                self.write_predicates(&block.predicates, 1);
                self.push(" .");
            }
            None => {
                self.push("[ ");
                self.write_predicates(&block.predicates, 1);
                self.push(" ] .");
            }
        }
    }

    fn write_predicates(&mut self, predicates: &[PredicateNode], depth: usize) {
        for (i, p) in predicates.iter().enumerate() {
            if i > 0 {
                self.push(" ;");
                self.newline(depth);
            }
            self.push(&p.predicate);
            self.write_objects(&p.objects, depth);
        }
    }

    /// Each object is preceded by a space, or by a line break when it would
    /// run past the maximum line length.
    fn write_objects(&mut self, objects: &[ObjectNode], depth: usize) {
        let wrap_indent = (depth + 1) * self.options.indent_width;
        for (i, object) in objects.iter().enumerate() {
            if i > 0 {
                self.push(",");
            }
            let more = i + 1 < objects.len();
            let width = 1 + self.first_line_width(object, depth) + usize::from(more);
            if self.column + width > self.options.max_line_length && self.column > wrap_indent {
                self.newline(depth + 1);
            } else {
                self.push(" ");
            }
            match object {
                ObjectNode::Leaf(text) => self.push(text),
                ObjectNode::Nested(predicates) => {
                    self.push("[ ");
                    self.write_predicates(predicates, depth + 1);
                    self.push(" ]");
                }
            }
        }
    }

    /// Width of the first output line `object` would produce.
    fn first_line_width(&self, object: &ObjectNode, depth: usize) -> usize {
        match object {
            ObjectNode::Leaf(text) => text.chars().count(),
            ObjectNode::Nested(predicates) => {
                let unbounded = TurtleOptions {
                    max_line_length: usize::MAX,
                    ..self.options.clone()
                };
                let mut scratch = Writer::new(&unbounded);
                scratch.push("[ ");
                scratch.write_predicates(predicates, depth + 1);
                scratch.push(" ]");
                scratch.out.lines().next().map_or(0, |l| l.chars().count())
            }
        }
    }
}
