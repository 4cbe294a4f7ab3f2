use std::collections::{HashMap, HashSet};

use crate::model::BlankNode;
use crate::prefix::is_name_char;

/// Issues sequential blank node labels (`b1`, `b2`, ... or `t0`, `t1`, ...)
/// for one parse or import pass.
///
/// `label_for` is memoized on the foreign identity, so the same foreign
/// blank node always maps to the same label within the pass. `fresh` issues
/// a label no foreign node is bound to.
#[derive(Clone, Debug)]
pub struct BlankNodeTable {
    prefix: String,
    counter: u64,
    issued: HashMap<String, String>,
}

impl BlankNodeTable {
    pub fn new(prefix: &str, start: u64) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: start,
            issued: HashMap::new(),
        }
    }

    /// Table used by adapters importing from a foreign model (`_:tN`).
    pub fn for_import() -> Self {
        Self::new("t", 0)
    }

    fn next_label(&mut self) -> String {
        let label = format!("{}{}", self.prefix, self.counter);
        self.counter += 1;
        label
    }

    /// Issue an unbound label.
    pub fn fresh(&mut self) -> BlankNode {
        BlankNode::new(self.next_label())
    }

    /// The label bound to `foreign_id`, issuing one on first sight.
    pub fn label_for(&mut self, foreign_id: &str) -> BlankNode {
        self.label_avoiding(foreign_id, &HashSet::new())
    }

    /// Like [`label_for`](Self::label_for), but a newly issued label skips
    /// anything in `taken`.
    pub fn label_avoiding(&mut self, foreign_id: &str, taken: &HashSet<String>) -> BlankNode {
        if let Some(label) = self.issued.get(foreign_id) {
            return BlankNode::new(label.as_str());
        }
        let label = loop {
            let candidate = self.next_label();
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        self.issued.insert(foreign_id.to_string(), label.clone());
        BlankNode::new(label)
    }
}

/// True when `_:id` reads back from Turtle as the same label.
pub(crate) fn is_turtle_label(id: &str) -> bool {
    !id.is_empty() && !id.ends_with('.') && id.chars().all(is_name_char)
}
