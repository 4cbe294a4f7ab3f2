use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RdfError, Result};

/// JSON-LD gen-delim characters. A context term whose IRI ends in one of
/// these can be used as a prefix.
const GEN_DELIMS: &[char] = &['/', '#', ':', '?', '[', ']', '@'];

/// An ordered mapping from namespace prefix to namespace IRI.
///
/// Order matters: it is the order prefixes were declared in, which is also
/// the order `@prefix` lines are written in and the tie-break when two
/// namespaces match an IRI equally well.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable {
    entries: IndexMap<String, String>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefix. A later registration of the same prefix replaces
    /// the namespace but keeps the original position.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Index of a prefix in declaration order.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries.get_index_of(prefix)
    }

    /// Append every prefix of `other` that is not already declared here.
    pub fn merge(&mut self, other: &PrefixTable) {
        for (prefix, namespace) in other.iter() {
            if !self.contains(prefix) {
                self.insert(prefix, namespace);
            }
        }
    }

    /// Expand `prefix:local` to a full IRI.
    pub fn expand(&self, prefix: &str, local: &str) -> Option<String> {
        self.get(prefix).map(|ns| format!("{ns}{local}"))
    }

    /// Find the longest namespace that `iri` starts with and whose remainder
    /// is a local name that reads back unambiguously. Returns
    /// `(prefix, local)`. Prefixes Turtle cannot declare (such as `1a`) are
    /// never used.
    pub fn compact<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace) in self.iter() {
            if !is_prefix_name(prefix) {
                continue;
            }
            let Some(local) = iri.strip_prefix(namespace) else {
                continue;
            };
            if !is_safe_local_name(local) {
                continue;
            }
            // Strictly longer wins; ties keep the earlier declaration.
            match best {
                Some((_, best_local)) if best_local.len() <= local.len() => {}
                _ => best = Some((prefix, local)),
            }
        }
        best
    }

    /// Derive a prefix table from a JSON-LD `@context` value.
    ///
    /// Accepts a context object, an array of context objects, or a document
    /// object carrying an `@context` entry. Remote context URLs cannot be
    /// resolved here and are skipped.
    pub fn from_jsonld_context(context: &Value) -> Result<Self> {
        let mut table = Self::new();
        table.collect_context(context)?;
        tracing::debug!(prefixes = table.len(), "prefix table derived from JSON-LD context");
        Ok(table)
    }

    fn collect_context(&mut self, context: &Value) -> Result<()> {
        match context {
            Value::Null => {}
            Value::String(url) => {
                tracing::debug!(url = %url, "skipping remote JSON-LD context");
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_context(item)?;
                }
            }
            Value::Object(obj) => {
                if let Some(inner) = obj.get("@context") {
                    return self.collect_context(inner);
                }
                for (term, definition) in obj {
                    if term.starts_with('@') {
                        continue;
                    }
                    if let Some(namespace) = prefix_namespace(definition) {
                        tracing::trace!(prefix = %term, namespace = %namespace, "context prefix");
                        self.insert(term.as_str(), namespace);
                    }
                }
            }
            other => {
                return Err(RdfError::context(format!(
                    "invalid @context value: {other}"
                )));
            }
        }
        Ok(())
    }
}

impl<P: Into<String>, N: Into<String>> FromIterator<(P, N)> for PrefixTable {
    fn from_iter<T: IntoIterator<Item = (P, N)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (prefix, namespace) in iter {
            table.insert(prefix, namespace);
        }
        table
    }
}

/// The namespace a context term definition contributes, if it is usable as a
/// prefix.
fn prefix_namespace(definition: &Value) -> Option<&str> {
    match definition {
        Value::String(iri) if iri.ends_with(GEN_DELIMS) => Some(iri),
        Value::Object(def) => {
            let iri = def.get("@id")?.as_str()?;
            match def.get("@prefix").and_then(Value::as_bool) {
                Some(true) => Some(iri),
                Some(false) => None,
                None if iri.ends_with(GEN_DELIMS) => Some(iri),
                None => None,
            }
        }
        _ => None,
    }
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// A prefix name Turtle accepts in `@prefix` and in `prefix:local`: empty,
/// or a letter followed by name characters.
pub(crate) fn is_prefix_name(prefix: &str) -> bool {
    match prefix.chars().next() {
        None => true,
        Some(first) => first.is_alphabetic() && prefix.chars().all(is_name_char),
    }
}

/// A local name the Turtle parser reads back to exactly the same string.
pub(crate) fn is_safe_local_name(local: &str) -> bool {
    if local.starts_with(['.', '-']) || local.ends_with('.') {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
