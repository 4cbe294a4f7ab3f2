use crate::codec::text_input;
use crate::error::{RdfError, Result};
use crate::escape::unescape_literal;
use crate::model::*;

/// Parse an N-Quads document into a Dataset.
///
/// Lines are independent; the first malformed line aborts the parse.
pub fn parse(input: &str) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    for (line_num, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let quad = parse_line(line, line_num + 1)?;
        dataset.add(quad);
    }
    tracing::debug!(quads = dataset.len(), "parsed N-Quads document");
    Ok(dataset)
}

/// Parse N-Quads from raw bytes, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Dataset> {
    parse(text_input(input)?)
}

fn parse_line(line: &str, line_num: usize) -> Result<Quad> {
    let mut cursor = Cursor::new(line, line_num);

    cursor.skip_whitespace();
    let subject = cursor.parse_subject()?;
    cursor.skip_whitespace();
    let predicate = cursor.parse_iri()?;
    cursor.skip_whitespace();
    let object = cursor.parse_object()?;
    cursor.skip_whitespace();

    // Optional graph
    let graph = if cursor.peek() == Some('.') {
        GraphLabel::Default
    } else {
        let g = cursor.parse_graph()?;
        cursor.skip_whitespace();
        g
    };

    cursor.expect_char('.')?;
    cursor.skip_whitespace();
    match cursor.peek() {
        None | Some('#') => {}
        Some(_) => return Err(cursor.error("unexpected content after '.'")),
    }

    Ok(Quad {
        subject,
        predicate,
        object,
        graph,
    })
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line_num: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, line_num: usize) -> Self {
        Self {
            input,
            pos: 0,
            line_num,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn column(&self) -> usize {
        self.input[..self.pos].chars().count() + 1
    }

    fn error(&self, msg: impl std::fmt::Display) -> RdfError {
        RdfError::parse(self.line_num, self.column(), msg)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' {
                self.advance(ch.len_utf8());
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance(ch.len_utf8());
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of line"))),
        }
    }

    fn parse_iri(&mut self) -> Result<NamedNode> {
        self.expect_char('<')?;
        let start = self.pos;
        match self.remaining().find('>') {
            Some(len) => {
                self.advance(len + 1);
                Ok(NamedNode::new(&self.input[start..start + len]))
            }
            None => Err(self.error("unterminated IRI")),
        }
    }

    fn parse_blank_node(&mut self) -> Result<BlankNode> {
        self.expect_char('_')?;
        self.expect_char(':')?;
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '<' {
                break;
            }
            // A '.' ends the label only when it ends the statement.
            if ch == '.' && self.remaining()[1..].chars().next().is_none_or(char::is_whitespace) {
                break;
            }
            self.advance(ch.len_utf8());
        }
        let id = &self.input[start..self.pos];
        if id.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        Ok(BlankNode::new(id))
    }

    fn parse_subject(&mut self) -> Result<Subject> {
        match self.peek() {
            Some('<') => Ok(Subject::Named(self.parse_iri()?)),
            Some('_') => Ok(Subject::Blank(self.parse_blank_node()?)),
            Some(ch) => Err(self.error(format!("unexpected character '{ch}' in subject position"))),
            None => Err(self.error("unexpected end of line in subject position")),
        }
    }

    fn parse_object(&mut self) -> Result<Object> {
        match self.peek() {
            Some('<') => Ok(Object::Named(self.parse_iri()?)),
            Some('_') => Ok(Object::Blank(self.parse_blank_node()?)),
            Some('"') => Ok(Object::Literal(self.parse_literal()?)),
            Some(ch) => Err(self.error(format!("unexpected character '{ch}' in object position"))),
            None => Err(self.error("unexpected end of line in object position")),
        }
    }

    fn parse_graph(&mut self) -> Result<GraphLabel> {
        match self.peek() {
            Some('<') => Ok(GraphLabel::Named(self.parse_iri()?)),
            Some('_') => Ok(GraphLabel::Blank(self.parse_blank_node()?)),
            Some(ch) => Err(self.error(format!("unexpected character '{ch}' in graph position"))),
            None => Err(self.error("expected '.', found end of line")),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let open = self.column();
        self.expect_char('"')?;
        let start = self.pos;
        // Find the closing quote, stepping over escapes.
        let mut escaped = false;
        let mut end = None;
        for (offset, ch) in self.remaining().char_indices() {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    end = Some(offset);
                    break;
                }
                _ => {}
            }
        }
        let Some(len) = end else {
            return Err(RdfError::parse(
                self.line_num,
                open,
                "unterminated string literal",
            ));
        };
        let raw = &self.input[start..start + len];
        let value = unescape_literal(raw).map_err(|e| self.error(e))?;
        self.advance(len + 1);

        match self.peek() {
            Some('@') => {
                self.advance(1);
                let start = self.pos;
                while let Some(ch) = self.peek() {
                    if !(ch.is_ascii_alphanumeric() || ch == '-') {
                        break;
                    }
                    self.advance(ch.len_utf8());
                }
                let lang = &self.input[start..self.pos];
                if lang.is_empty() {
                    return Err(self.error("empty language tag"));
                }
                Ok(Literal::lang(value, lang))
            }
            Some('^') => {
                self.advance(1);
                self.expect_char('^')?;
                let datatype = self.parse_iri()?;
                Ok(Literal::typed(value, datatype))
            }
            _ => Ok(Literal::new(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_quad(ds: &Dataset) -> &Quad {
        assert_eq!(ds.len(), 1);
        ds.quads().next().unwrap()
    }

    #[test]
    fn parse_simple_triple() {
        let input = "<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n";
        let ds = parse(input).unwrap();
        let q = only_quad(&ds);
        assert_eq!(
            q.subject,
            Subject::Named(NamedNode::new("http://example.org/s"))
        );
        assert_eq!(q.predicate, NamedNode::new("http://example.org/p"));
        assert_eq!(
            q.object,
            Object::Named(NamedNode::new("http://example.org/o"))
        );
        assert_eq!(q.graph, GraphLabel::Default);
    }

    #[test]
    fn parse_blank_nodes() {
        let ds = parse("_:b0 <http://example.org/p> _:b1.\n").unwrap();
        let q = only_quad(&ds);
        assert_eq!(q.subject, Subject::Blank(BlankNode::new("b0")));
        assert_eq!(q.object, Object::Blank(BlankNode::new("b1")));
    }

    #[test]
    fn parse_blank_node_with_inner_dot() {
        let ds = parse("_:a.b <http://example.org/p> _:c .\n").unwrap();
        assert_eq!(only_quad(&ds).subject, Subject::Blank(BlankNode::new("a.b")));
    }

    #[test]
    fn parse_typed_literal() {
        let input = "<http://example.org/s> <http://example.org/p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n";
        let ds = parse(input).unwrap();
        match &only_quad(&ds).object {
            Object::Literal(lit) => {
                assert_eq!(lit.value, "42");
                assert_eq!(lit.datatype.iri, xsd::INTEGER);
                assert!(lit.language.is_none());
            }
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn parse_lang_literal() {
        let input = "<http://example.org/s> <http://example.org/p> \"bonjour\"@fr-CA .\n";
        let ds = parse(input).unwrap();
        match &only_quad(&ds).object {
            Object::Literal(lit) => {
                assert_eq!(lit.value, "bonjour");
                assert_eq!(lit.language.as_deref(), Some("fr-CA"));
                assert_eq!(lit.datatype.iri, rdf::LANG_STRING);
            }
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn parse_plain_literal_defaults_to_xsd_string() {
        let ds = parse("<http://a/s> <http://a/p> \"v\" .").unwrap();
        assert_eq!(only_quad(&ds).object, Object::Literal(Literal::new("v")));
    }

    #[test]
    fn parse_named_graph() {
        let input = "<http://example.org/s> <http://example.org/p> <http://example.org/o> <http://example.org/g> .\n";
        let ds = parse(input).unwrap();
        let g = GraphLabel::Named(NamedNode::new("http://example.org/g"));
        assert_eq!(ds.get_quads(&g).len(), 1);
        assert!(ds.get_quads(&GraphLabel::Default).is_empty());
    }

    #[test]
    fn parse_escaped_literal() {
        let input = r#"<http://example.org/s> <http://example.org/p> "line1\nline2\t\"quoted\"" ."#;
        let ds = parse(input).unwrap();
        match &only_quad(&ds).object {
            Object::Literal(lit) => assert_eq!(lit.value, "line1\nline2\t\"quoted\""),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn parse_skip_comments_and_empty() {
        let input = "# comment\n\n<http://example.org/s> <http://example.org/p> <http://example.org/o> . # trailing\n\n";
        let ds = parse(input).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn parse_error_reports_position() {
        let input = "<http://a/s> <http://a/p> <http://a/o> .\n<http://a/s> oops <http://a/o> .\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.position(), Some((2, 14)));
    }

    #[test]
    fn parse_error_missing_dot() {
        let err = parse("<http://a/s> <http://a/p> <http://a/o>").unwrap_err();
        assert!(matches!(err, RdfError::ParseError { line: 1, .. }));
    }

    #[test]
    fn parse_error_unterminated_literal() {
        let err = parse("<http://a/s> <http://a/p> \"open .").unwrap_err();
        assert_eq!(err.position(), Some((1, 27)));
    }

    #[test]
    fn parse_bytes_rejects_non_utf8() {
        let err = parse_bytes(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, RdfError::InvalidInput(_)));
    }

    #[test]
    fn roundtrip_parse_serialize() {
        let input = "<http://example.org/s> <http://example.org/p> \"hello world\" .\n";
        let ds = parse(input).unwrap();
        let output = super::super::serializer::serialize_dataset(&ds);
        assert_eq!(input, output);
    }
}
