use crate::blank::BlankNodeTable;
use crate::codec::text_input;
use crate::error::{RdfError, Result};
use crate::escape::unescape_literal;
use crate::model::*;
use crate::prefix::{is_name_char, is_prefix_name};

/// Parse a Turtle document into a Dataset.
///
/// Accepts `@prefix` declarations at the top of the document followed by
/// triples built from IRIs, prefixed names, blank node labels, anonymous
/// `[ ... ]` blank nodes, the `a` keyword and quoted literals. The first
/// grammar violation aborts the parse.
pub fn parse(input: &str) -> Result<Dataset> {
    TurtleParser::new(input).run()
}

/// Parse Turtle from raw bytes, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Dataset> {
    parse(text_input(input)?)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitSubject,
    AwaitPredicate,
    AwaitObject,
    AwaitContinuation,
}

/// Subject and predicate saved while inside a `[ ... ]` property list.
#[derive(Debug)]
struct Frame {
    subject: Option<Subject>,
    predicate: Option<NamedNode>,
}

struct TurtleParser<'a> {
    lines: Vec<&'a str>,
    line_idx: usize,
    pos: usize,
    state: State,
    subject: Option<Subject>,
    predicate: Option<NamedNode>,
    frames: Vec<Frame>,
    in_prologue: bool,
    blanks: BlankNodeTable,
    dataset: Dataset,
}

impl<'a> TurtleParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().collect(),
            line_idx: 0,
            pos: 0,
            state: State::AwaitSubject,
            subject: None,
            predicate: None,
            frames: Vec::new(),
            in_prologue: true,
            blanks: BlankNodeTable::new("b", 1),
            dataset: Dataset::new(),
        }
    }

    fn run(mut self) -> Result<Dataset> {
        tracing::debug!(lines = self.lines.len(), "parsing Turtle document");
        while self.skip_blank() {
            if self.in_prologue {
                if self.try_prefix() {
                    continue;
                }
                self.in_prologue = false;
            }
            match self.state {
                State::AwaitSubject => self.read_subject()?,
                State::AwaitPredicate => self.read_predicate()?,
                State::AwaitObject => self.read_object()?,
                State::AwaitContinuation => self.read_continuation()?,
            }
        }
        if self.state != State::AwaitSubject || !self.frames.is_empty() {
            return Err(self.error("unexpected end of input"));
        }
        tracing::debug!(
            quads = self.dataset.len(),
            prefixes = self.dataset.namespaces().len(),
            "parsed Turtle document"
        );
        Ok(self.dataset)
    }

    // ---- cursor ----

    fn line(&self) -> &'a str {
        self.lines.get(self.line_idx).copied().unwrap_or("")
    }

    fn rest(&self) -> &'a str {
        &self.line()[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Give back a character that a greedy match took too far.
    fn unread(&mut self, ch: char) {
        self.pos -= ch.len_utf8();
    }

    /// Skip whitespace and comments, moving to the next line when the
    /// current one is used up. Returns false at end of input.
    fn skip_blank(&mut self) -> bool {
        loop {
            if self.line_idx >= self.lines.len() {
                return false;
            }
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.advance(rest.len() - trimmed.len());
            if trimmed.is_empty() || trimmed.starts_with('#') {
                self.line_idx += 1;
                self.pos = 0;
                continue;
            }
            return true;
        }
    }

    /// 1-based line and column of the cursor. Past the last line this is
    /// the end of the last line.
    fn position(&self) -> (usize, usize) {
        if self.line_idx < self.lines.len() {
            let column = self.line()[..self.pos].chars().count() + 1;
            (self.line_idx + 1, column)
        } else if let Some(last) = self.lines.last() {
            (self.lines.len(), last.chars().count() + 1)
        } else {
            (1, 1)
        }
    }

    fn error(&self, msg: impl std::fmt::Display) -> RdfError {
        let (line, column) = self.position();
        RdfError::parse(line, column, msg)
    }

    // ---- productions ----

    fn try_prefix(&mut self) -> bool {
        let Some((prefix, namespace, len)) = match_prefix_directive(self.rest()) else {
            return false;
        };
        tracing::trace!(prefix = %prefix, namespace = %namespace, "prefix declared");
        self.dataset.set_namespace(prefix, namespace);
        self.advance(len);
        true
    }

    fn read_subject(&mut self) -> Result<()> {
        if let Some(iri) = self.read_iri()? {
            self.subject = Some(Subject::Named(NamedNode::new(iri)));
        } else if let Some(iri) = self.read_prefixed_name() {
            self.subject = Some(Subject::Named(NamedNode::new(iri)));
        } else if let Some(node) = self.read_blank_label()? {
            self.subject = Some(Subject::Blank(node));
        } else if let Some(len) = empty_anon_len(self.rest()) {
            self.advance(len);
            self.subject = Some(Subject::Blank(self.blanks.fresh()));
        } else if self.rest().starts_with('[') {
            self.advance(1);
            let node = self.blanks.fresh();
            self.push_frame();
            self.subject = Some(Subject::Blank(node));
        } else {
            return Err(self.error("missing expected subject"));
        }
        self.state = State::AwaitPredicate;
        Ok(())
    }

    fn read_predicate(&mut self) -> Result<()> {
        let iri = if let Some(iri) = self.read_iri()? {
            iri
        } else if let Some(iri) = self.read_prefixed_name() {
            iri
        } else if self.at_keyword_a() {
            self.advance(1);
            rdf::TYPE.to_string()
        } else {
            return Err(self.error("missing expected predicate"));
        };
        self.predicate = Some(NamedNode::new(iri));
        self.state = State::AwaitObject;
        Ok(())
    }

    fn read_object(&mut self) -> Result<()> {
        let (Some(subject), Some(predicate)) = (self.subject.clone(), self.predicate.clone())
        else {
            return Err(self.error("missing expected predicate"));
        };

        if let Some(len) = empty_anon_len(self.rest()) {
            self.advance(len);
            let node = self.blanks.fresh();
            self.dataset.add_triple(subject, predicate, node);
            self.state = State::AwaitContinuation;
            return Ok(());
        }

        if self.rest().starts_with('[') {
            self.advance(1);
            let node = self.blanks.fresh();
            self.dataset.add_triple(subject, predicate, node.clone());
            self.push_frame();
            self.subject = Some(Subject::Blank(node));
            self.state = State::AwaitPredicate;
            return Ok(());
        }

        let object = if let Some(iri) = self.read_iri()? {
            Object::Named(NamedNode::new(iri))
        } else if let Some(iri) = self.read_prefixed_name() {
            Object::Named(NamedNode::new(iri))
        } else if let Some(node) = self.read_blank_label()? {
            Object::Blank(node)
        } else if let Some(literal) = self.read_literal()? {
            Object::Literal(literal)
        } else {
            return Err(self.error("missing expected object"));
        };
        self.dataset.add_triple(subject, predicate, object);
        self.state = State::AwaitContinuation;
        Ok(())
    }

    fn read_continuation(&mut self) -> Result<()> {
        match self.rest().chars().next() {
            Some(']') => {
                let Some(frame) = self.frames.pop() else {
                    return Err(self.error("unexpected \"]\""));
                };
                self.advance(1);
                self.subject = frame.subject;
                self.predicate = frame.predicate;
            }
            Some(',') if self.predicate.is_some() => {
                self.advance(1);
                self.state = State::AwaitObject;
            }
            Some(';') if self.subject.is_some() => {
                self.advance(1);
                self.predicate = None;
                self.state = State::AwaitPredicate;
            }
            Some('.') => {
                if !self.frames.is_empty() {
                    return Err(self.error("missing expected \"]\""));
                }
                self.advance(1);
                self.subject = None;
                self.predicate = None;
                self.state = State::AwaitSubject;
            }
            _ => return Err(self.error("expected one of \"]\", \",\", \";\", \".\"")),
        }
        Ok(())
    }

    /// Save the current subject and predicate before descending into `[`.
    fn push_frame(&mut self) {
        self.frames.push(Frame {
            subject: self.subject.take(),
            predicate: self.predicate.take(),
        });
    }

    // ---- terms ----

    fn read_iri(&mut self) -> Result<Option<String>> {
        let Some(body) = self.rest().strip_prefix('<') else {
            return Ok(None);
        };
        let Some(close) = body.find('>') else {
            return Err(self.error("unterminated IRI"));
        };
        let iri = body[..close].to_string();
        self.advance(close + 2);
        Ok(Some(iri))
    }

    /// `prefix:local`, expanded through the declared prefixes. A name with
    /// an undeclared prefix is kept verbatim as `prefix:local`.
    fn read_prefixed_name(&mut self) -> Option<String> {
        let (prefix, mut local) = split_prefixed_name(self.rest())?;
        self.advance(prefix.len() + 1 + local.len());
        // The local part is greedy about '.', which is also the statement
        // terminator.
        if let Some(stripped) = local.strip_suffix('.') {
            self.unread('.');
            local = stripped;
        }
        match self.dataset.namespaces().expand(prefix, local) {
            Some(iri) => Some(iri),
            None => {
                tracing::warn!(prefix = %prefix, local = %local, "undeclared prefix, keeping name as-is");
                Some(format!("{prefix}:{local}"))
            }
        }
    }

    fn read_blank_label(&mut self) -> Result<Option<BlankNode>> {
        let Some(body) = self.rest().strip_prefix("_:") else {
            return Ok(None);
        };
        let len = body
            .find(|c: char| !is_name_char(c))
            .unwrap_or(body.len());
        let mut label = &body[..len];
        if label.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        self.advance(2 + len);
        if let Some(stripped) = label.strip_suffix('.') {
            self.unread('.');
            label = stripped;
        }
        Ok(Some(self.blanks.label_for(label)))
    }

    fn read_literal(&mut self) -> Result<Option<Literal>> {
        let Some(body) = self.rest().strip_prefix('"') else {
            return Ok(None);
        };
        let Some(len) = closing_quote(body) else {
            return Err(self.error("missing expected '\"'"));
        };
        let value = unescape_literal(&body[..len]).map_err(|e| self.error(e))?;
        self.advance(len + 2);

        let rest = self.rest();
        if let Some(tag) = rest.strip_prefix('@') {
            let tag_len = tag
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(tag.len());
            if tag_len == 0 {
                return Err(self.error("missing expected language tag"));
            }
            let language = &tag[..tag_len];
            self.advance(1 + tag_len);
            return Ok(Some(Literal::lang(value, language)));
        }
        if rest.starts_with("^^") {
            self.advance(2);
            let datatype = match self.read_iri()? {
                Some(iri) => iri,
                None => self
                    .read_prefixed_name()
                    .ok_or_else(|| self.error("missing expected datatype"))?,
            };
            return Ok(Some(Literal::typed(value, NamedNode::new(datatype))));
        }
        Ok(Some(Literal::new(value)))
    }

    /// The `a` keyword: a lone `a` not followed by a name character.
    fn at_keyword_a(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('a')
            && chars
                .next()
                .is_none_or(|c| c.is_whitespace() || matches!(c, '<' | '[' | '"' | '_'))
    }
}

/// Match `@prefix name: <iri> .` at the start of `text`. Returns the prefix,
/// the namespace and the number of bytes matched.
fn match_prefix_directive(text: &str) -> Option<(&str, &str, usize)> {
    let after_keyword = text.strip_prefix("@prefix")?;
    let name = after_keyword.trim_start();
    if name.len() == after_keyword.len() {
        return None;
    }
    let colon = name.find(':')?;
    let prefix = &name[..colon];
    if !is_prefix_name(prefix) {
        return None;
    }
    let iri_body = name[colon + 1..].trim_start().strip_prefix('<')?;
    let close = iri_body.find('>')?;
    let namespace = &iri_body[..close];
    let tail = iri_body[close + 1..].trim_start().strip_prefix('.')?;
    Some((prefix, namespace, text.len() - tail.len()))
}

/// Split `prefix:local` off the start of `text`.
fn split_prefixed_name(text: &str) -> Option<(&str, &str)> {
    let colon = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
    let prefix = &text[..colon];
    if !text[colon..].starts_with(':') || !is_prefix_name(prefix) {
        return None;
    }
    let body = &text[colon + 1..];
    let len = body.find(|c: char| !is_local_char(c)).unwrap_or(body.len());
    Some((prefix, &body[..len]))
}

/// Length of an empty `[ ]` at the start of `text`, if there is one on
/// this line.
fn empty_anon_len(text: &str) -> Option<usize> {
    let inner = text.strip_prefix('[')?.trim_start();
    inner.starts_with(']').then(|| text.len() - inner.len() + 1)
}

/// Byte offset of the first unescaped `"` in `body`.
fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (offset, ch) in body.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(offset),
            _ => {}
        }
    }
    None
}

fn is_local_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | ';' | '[' | ']' | '<' | '>' | '"' | '(' | ')' | '#')
}
