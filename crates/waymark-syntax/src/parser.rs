use std::collections::BTreeMap;

use waymark_ast::{
    is_valid_key, Document, DocumentName, LiteralZone, MapEntry, Node, Scalar, Value,
};

use crate::errors::ParseError;
use crate::token::{Token, TokenKind};

/// Builds a [`Document`] from a token stream.
///
/// Recursive descent over lines: indentation widths come from token columns,
/// sibling runs share one width, and any deeper line must have been opened
/// by a trailing `:`. All errors are fatal; no partial tree escapes.
pub fn parse(tokens: &[Token]) -> Result<Document, ParseError> {
    Parser { tokens, pos: 0 }.run()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<Document, ParseError> {
        let frontmatter = if self.at(TokenKind::Frontmatter) {
            Some(self.advance().value.clone())
        } else {
            None
        };
        self.skip_comment_lines();

        if !self.at(TokenKind::DocHeader) {
            return Err(ParseError::MissingHeader {
                line: self.cur().line,
            });
        }
        let header = self.advance().clone();
        let name = DocumentName::parse(header.value.clone()).map_err(|_| {
            ParseError::InvalidDocumentName {
                name: header.value.clone(),
                line: header.line,
            }
        })?;
        self.eat_newline();
        self.skip_comment_lines();

        let meta = self.parse_meta()?;
        let body = self.parse_nodes(0)?;

        match self.kind() {
            TokenKind::DocEnd => {
                self.advance();
                self.eat_newline();
            }
            TokenKind::Eof => {
                return Err(ParseError::MissingEnd { line: header.line });
            }
            _ => return Err(self.unexpected("'===END==='")),
        }
        self.skip_comment_lines();
        if !self.at(TokenKind::Eof) {
            return Err(ParseError::TrailingContent {
                line: self.cur().line,
            });
        }

        let mut doc = Document::new(name, meta, body);
        if let Some(fm) = frontmatter {
            doc = doc.with_frontmatter(fm);
        }
        Ok(doc)
    }

    /// `META:` and its assignment lines. META never nests.
    fn parse_meta(&mut self) -> Result<Vec<Node>, ParseError> {
        let is_meta = self.at(TokenKind::Ident)
            && self.cur().value == "META"
            && self.peek_kind(1) == TokenKind::Colon;
        if !is_meta {
            return Err(ParseError::MissingMeta {
                line: self.cur().line,
            });
        }
        let parent = (self.cur().column - 1) as usize;
        self.advance();
        self.advance();
        self.skip_trailing_comment();
        self.eat_newline();

        let children = self.parse_children(parent)?;
        for node in &children {
            if !matches!(node, Node::Assignment { .. }) {
                return Err(ParseError::MetaContainer {
                    key: node.key_name().to_string(),
                });
            }
        }
        Ok(children)
    }

    /// A maximal run of sibling nodes sharing one indentation width.
    /// Stops without consuming at a dedent, `===END===`, or end of input.
    fn parse_nodes(&mut self, pinned: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        let mut seen: BTreeMap<String, u32> = BTreeMap::new();
        loop {
            self.skip_comment_lines();
            match self.kind() {
                TokenKind::DocEnd | TokenKind::DocHeader | TokenKind::Eof => break,
                _ => {}
            }
            let width = (self.cur().column - 1) as usize;
            if width < pinned {
                break;
            }
            if width > pinned {
                return Err(ParseError::IndentMismatch {
                    line: self.cur().line,
                    width,
                    expected: pinned,
                });
            }
            let line = self.cur().line;
            let node = self.parse_node()?;
            if let Some(first) = seen.insert(node.key_name().to_string(), line) {
                return Err(ParseError::DuplicateKey {
                    key: node.key_name().to_string(),
                    line,
                    first_line: first,
                });
            }
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Children of a container whose name sits at width `parent`. An
    /// immediately shallower or equal line means the container is empty.
    fn parse_children(&mut self, parent: usize) -> Result<Vec<Node>, ParseError> {
        self.skip_comment_lines();
        match self.kind() {
            TokenKind::DocEnd | TokenKind::DocHeader | TokenKind::Eof => return Ok(Vec::new()),
            _ => {}
        }
        let width = (self.cur().column - 1) as usize;
        if width <= parent {
            return Ok(Vec::new());
        }
        self.parse_nodes(width)
    }

    /// One `key::value` assignment or `key:` container line, including the
    /// container's children.
    fn parse_node(&mut self) -> Result<Node, ParseError> {
        if !self.at(TokenKind::Ident) {
            return Err(self.unexpected("a key"));
        }
        let tok = self.advance().clone();
        let key = tok.value;
        if !is_valid_key(&key) {
            return Err(ParseError::InvalidKey {
                key,
                line: tok.line,
            });
        }
        match self.kind() {
            TokenKind::AssignOp => {
                self.advance();
                let value = self.parse_value()?;
                self.skip_trailing_comment();
                if !matches!(self.kind(), TokenKind::Newline | TokenKind::Eof) {
                    return Err(ParseError::MalformedAssignment {
                        key,
                        line: self.cur().line,
                        column: self.cur().column,
                    });
                }
                self.eat_newline();
                Ok(Node::assignment(key, value))
            }
            TokenKind::Colon => {
                self.advance();
                self.skip_trailing_comment();
                if !matches!(self.kind(), TokenKind::Newline | TokenKind::Eof) {
                    return Err(self.unexpected("end of line after ':'"));
                }
                self.eat_newline();
                let children = self.parse_children((tok.column - 1) as usize)?;
                Ok(Node::container(key, children))
            }
            _ => Err(self.unexpected("'::' or ':'")),
        }
    }

    /// The value expression after `::`. An empty right-hand side is an
    /// explicit null, not an absence.
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.kind() {
            TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => Ok(Value::Null),
            TokenKind::Str => {
                let v = self.advance().value.clone();
                Ok(Value::str(v))
            }
            TokenKind::Number => {
                let v = self.advance().value.clone();
                Ok(Value::Scalar(Scalar::Num { v }))
            }
            TokenKind::Ident => {
                let v = self.advance().value.clone();
                Ok(match v.as_str() {
                    "true" => Value::bool(true),
                    "false" => Value::bool(false),
                    _ => Value::str(v),
                })
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_inline_map(),
            TokenKind::FenceOpen => self.parse_zone(),
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Single-line `[a, b]` list. Elements recurse through the full value
    /// grammar; a trailing comma is tolerated.
    fn parse_list(&mut self) -> Result<Value, ParseError> {
        let open = self.advance().clone();
        let mut items = Vec::new();
        loop {
            match self.kind() {
                TokenKind::RBracket => {
                    self.advance();
                    break;
                }
                TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => {
                    return Err(ParseError::UnclosedList {
                        line: open.line,
                        column: open.column,
                    });
                }
                _ => {
                    items.push(self.parse_value()?);
                    match self.kind() {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        TokenKind::RBracket => {
                            self.advance();
                            break;
                        }
                        TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => {
                            return Err(ParseError::UnclosedList {
                                line: open.line,
                                column: open.column,
                            });
                        }
                        _ => return Err(self.unexpected("',' or ']'")),
                    }
                }
            }
        }
        Ok(Value::List { items })
    }

    /// Single-line `{k=v, ...}` map. Values stay atomic scalars; nesting
    /// belongs in block form.
    fn parse_inline_map(&mut self) -> Result<Value, ParseError> {
        let open = self.advance().clone();
        let mut entries: Vec<MapEntry> = Vec::new();
        let mut seen: BTreeMap<String, u32> = BTreeMap::new();
        loop {
            match self.kind() {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => {
                    return Err(ParseError::UnclosedInlineMap {
                        line: open.line,
                        column: open.column,
                    });
                }
                TokenKind::Ident => {
                    let tok = self.advance().clone();
                    let key = tok.value;
                    if !is_valid_key(&key) {
                        return Err(ParseError::InvalidKey {
                            key,
                            line: tok.line,
                        });
                    }
                    if let Some(first) = seen.insert(key.clone(), tok.line) {
                        return Err(ParseError::DuplicateKey {
                            key,
                            line: tok.line,
                            first_line: first,
                        });
                    }
                    if !self.at(TokenKind::Equals) {
                        return Err(self.unexpected("'=' between key and value"));
                    }
                    self.advance();
                    let value = self.parse_atomic_scalar(&key)?;
                    entries.push(MapEntry { key, value });
                    match self.kind() {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        TokenKind::RBrace => {
                            self.advance();
                            break;
                        }
                        TokenKind::Newline | TokenKind::Comment | TokenKind::Eof => {
                            return Err(ParseError::UnclosedInlineMap {
                                line: open.line,
                                column: open.column,
                            });
                        }
                        _ => return Err(self.unexpected("',' or '}'")),
                    }
                }
                _ => return Err(self.unexpected("a key")),
            }
        }
        Ok(Value::InlineMap { entries })
    }

    fn parse_atomic_scalar(&mut self, key: &str) -> Result<Scalar, ParseError> {
        match self.kind() {
            TokenKind::Str => {
                let v = self.advance().value.clone();
                Ok(Scalar::Str { v })
            }
            TokenKind::Number => {
                let v = self.advance().value.clone();
                Ok(Scalar::Num { v })
            }
            TokenKind::Ident => {
                let v = self.advance().value.clone();
                Ok(match v.as_str() {
                    "true" => Scalar::Bool { v: true },
                    "false" => Scalar::Bool { v: false },
                    _ => Scalar::Str { v },
                })
            }
            TokenKind::LBracket | TokenKind::LBrace => Err(ParseError::NonAtomicMapValue {
                key: key.to_string(),
                line: self.cur().line,
                column: self.cur().column,
            }),
            _ => Err(self.unexpected("a value")),
        }
    }

    /// FENCE_OPEN / LITERAL_CONTENT / FENCE_CLOSE triple. The tokenizer
    /// guarantees the triple; a break here is a defect, not bad input.
    fn parse_zone(&mut self) -> Result<Value, ParseError> {
        let open = self.advance().clone();
        let marker: String = open.value.chars().take_while(|c| *c == '`').collect();
        let tag = &open.value[marker.len()..];
        let info_tag = if tag.is_empty() {
            None
        } else {
            Some(tag.to_string())
        };
        if !self.at(TokenKind::LiteralContent) {
            return Err(ParseError::FenceImbalance { line: open.line });
        }
        let content = self.advance().value.clone();
        if !self.at(TokenKind::FenceClose) {
            return Err(ParseError::FenceImbalance { line: open.line });
        }
        self.advance();
        Ok(Value::LiteralZone(LiteralZone {
            content,
            info_tag,
            fence_marker: marker,
        }))
    }

    fn cur(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.cur().kind
    }

    fn peek_kind(&self, ahead: usize) -> TokenKind {
        let i = (self.pos + ahead).min(self.tokens.len() - 1);
        self.tokens[i].kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn advance(&mut self) -> &'a Token {
        let tok = self.cur();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat_newline(&mut self) {
        if self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_trailing_comment(&mut self) {
        if self.at(TokenKind::Comment) {
            self.advance();
        }
    }

    /// Whole lines holding nothing but a comment.
    fn skip_comment_lines(&mut self) {
        while self.at(TokenKind::Comment) {
            self.advance();
            self.eat_newline();
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let tok = self.cur();
        let found = match tok.kind {
            TokenKind::Ident => format!("'{}'", tok.value),
            TokenKind::Number => format!("number {}", tok.value),
            TokenKind::Str => format!("string {:?}", tok.value),
            other => other.to_string(),
        };
        ParseError::UnexpectedToken {
            expected,
            found,
            line: tok.line,
            column: tok.column,
        }
    }
}
