use unicode_normalization::{is_nfc, UnicodeNormalization};

use crate::errors::LexError;
use crate::token::{Token, TokenKind};

/// Everything a single tokenizer pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput {
    /// Token stream, ending with an EOF token.
    pub tokens: Vec<Token>,
    /// Literal zone extents, as byte offsets into `text`.
    pub fence_spans: Vec<FenceSpan>,
    /// Normalized source buffer: BOM stripped, line endings folded to LF,
    /// text outside literal zones and frontmatter NFC-normalized. Fence
    /// spans index into this buffer, never into the raw input.
    pub text: String,
    /// One notice per line the NFC pass rewrote.
    pub notices: Vec<UnicodeNotice>,
}

/// Byte extent of one literal zone's content within [`LexOutput::text`].
///
/// `text[start..end]` is exactly the zone content the parser will carry:
/// the fence lines themselves sit outside the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSpan {
    /// Byte offset of the first content byte.
    pub start: usize,
    /// Byte offset one past the last content byte.
    pub end: usize,
    /// Line of the opening fence.
    pub open_line: u32,
    /// Line of the closing fence.
    pub close_line: u32,
    /// Backtick count of the fence marker.
    pub marker_len: usize,
}

/// Record of one line rewritten by Unicode NFC normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeNotice {
    /// 1-based line.
    pub line: u32,
    /// The line as received.
    pub before: String,
    /// The line after NFC.
    pub after: String,
}

/// Tokenizes lenient input in a single pass.
///
/// Outside literal zones and frontmatter each line is NFC-normalized and
/// checked for tabs; inside them bytes pass through verbatim. Errors are
/// fatal: no token stream is produced.
pub fn tokenize(input: &str) -> Result<LexOutput, LexError> {
    Lexer::default().run(input)
}

/// State for one literal zone between its opening and closing fences.
struct OpenFence {
    marker_len: usize,
    /// Leading spaces of the opening line; the close fence may sit at most
    /// three columns deeper.
    indent: usize,
    line: u32,
    /// `text.len()` immediately after the opening line was appended.
    span_start: usize,
    content: Vec<String>,
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    fence_spans: Vec<FenceSpan>,
    text: String,
    notices: Vec<UnicodeNotice>,
}

const IDENT_CONTINUE: &str = "_./-";
const FENCE_TAG_EXTRA: &str = "_+.-";

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || IDENT_CONTINUE.contains(c)
}

fn is_fence_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || FENCE_TAG_EXTRA.contains(c)
}

fn leading_spaces(s: &str) -> usize {
    s.len() - s.trim_start_matches(' ').len()
}

fn backtick_run(s: &str) -> usize {
    s.chars().take_while(|c| *c == '`').count()
}

impl Lexer {
    fn run(mut self, input: &str) -> Result<LexOutput, LexError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let mut lines: Vec<&str> = input.split('\n').collect();
        if input.ends_with('\n') {
            lines.pop();
        }

        let mut start = 0;
        if stripped(lines.first().copied().unwrap_or("")) == "---" && !lines.is_empty() {
            start = self.frontmatter(&lines)?;
        }

        let mut fence: Option<OpenFence> = None;
        for (idx, raw) in lines.iter().enumerate().skip(start) {
            let line_no = (idx + 1) as u32;
            let raw = stripped(raw);
            fence = match fence.take() {
                Some(open) => self.zone_line(open, raw, line_no)?,
                None => self.source_line(raw, line_no)?,
            };
        }
        if let Some(open) = fence {
            return Err(LexError::UnterminatedFence {
                marker: "`".repeat(open.marker_len),
                open_line: open.line,
            });
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            (lines.len() + 1) as u32,
            1,
        ));
        Ok(LexOutput {
            tokens: self.tokens,
            fence_spans: self.fence_spans,
            text: self.text,
            notices: self.notices,
        })
    }

    /// Captures `---` frontmatter verbatim and returns the index of the
    /// first line after the closing delimiter.
    fn frontmatter(&mut self, lines: &[&str]) -> Result<usize, LexError> {
        let close = lines
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, l)| stripped(l) == "---")
            .map(|(i, _)| i)
            .ok_or(LexError::UnterminatedFrontmatter { open_line: 1 })?;

        let inner: Vec<&str> = lines[1..close].iter().map(|l| stripped(l)).collect();
        self.text.push_str("---\n");
        for line in &inner {
            self.text.push_str(line);
            self.text.push('\n');
        }
        self.text.push_str("---\n");
        self.tokens
            .push(Token::new(TokenKind::Frontmatter, inner.join("\n"), 1, 1));
        Ok(close + 1)
    }

    /// One line inside an open literal zone. Returns the zone state, or
    /// `None` once the closing fence is consumed.
    fn zone_line(
        &mut self,
        mut open: OpenFence,
        raw: &str,
        line_no: u32,
    ) -> Result<Option<OpenFence>, LexError> {
        let indent = leading_spaces(raw);
        let run = backtick_run(&raw[indent..]);
        if run > 0 && indent <= open.indent + 3 {
            if run > open.marker_len {
                return Err(LexError::AmbiguousFence {
                    open_len: open.marker_len,
                    found_len: run,
                    open_line: open.line,
                    line: line_no,
                    trailing: false,
                });
            }
            if run == open.marker_len {
                let after = &raw[indent + run..];
                if !after.trim().is_empty() {
                    return Err(LexError::AmbiguousFence {
                        open_len: open.marker_len,
                        found_len: run,
                        open_line: open.line,
                        line: line_no,
                        trailing: true,
                    });
                }
                let content = open.content.join("\n");
                self.fence_spans.push(FenceSpan {
                    start: open.span_start,
                    end: open.span_start + content.len(),
                    open_line: open.line,
                    close_line: line_no,
                    marker_len: open.marker_len,
                });
                self.tokens.push(Token::new(
                    TokenKind::LiteralContent,
                    content,
                    open.line + 1,
                    1,
                ));
                self.tokens.push(Token::new(
                    TokenKind::FenceClose,
                    "`".repeat(run),
                    line_no,
                    (indent + 1) as u32,
                ));
                self.tokens
                    .push(Token::new(TokenKind::Newline, "", line_no, 1));
                self.text.push_str(raw);
                self.text.push('\n');
                return Ok(None);
            }
        }
        self.text.push_str(raw);
        self.text.push('\n');
        open.content.push(raw.to_string());
        Ok(Some(open))
    }

    /// One line outside any literal zone.
    fn source_line(&mut self, raw: &str, line_no: u32) -> Result<Option<OpenFence>, LexError> {
        let line = if is_nfc(raw) {
            raw.to_string()
        } else {
            let after: String = raw.nfc().collect();
            self.notices.push(UnicodeNotice {
                line: line_no,
                before: raw.to_string(),
                after: after.clone(),
            });
            after
        };
        if let Some(byte) = line.find('\t') {
            let column = (line[..byte].chars().count() + 1) as u32;
            return Err(LexError::TabOutsideZone {
                line: line_no,
                column,
            });
        }
        self.text.push_str(&line);
        self.text.push('\n');

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Some(inner) = header_name(trimmed) {
            let column = (leading_spaces(&line) + 1) as u32;
            let kind = if inner == "END" {
                TokenKind::DocEnd
            } else {
                TokenKind::DocHeader
            };
            self.tokens.push(Token::new(kind, inner, line_no, column));
            self.tokens
                .push(Token::new(TokenKind::Newline, "", line_no, 1));
            return Ok(None);
        }
        self.scan_line(&line, line_no)
    }

    /// Tokenizes one content line. Returns zone state when the line ends by
    /// opening a literal zone fence.
    fn scan_line(&mut self, line: &str, line_no: u32) -> Result<Option<OpenFence>, LexError> {
        let chars: Vec<char> = line.chars().collect();
        let indent = chars.iter().take_while(|c| **c == ' ').count();
        let mut i = indent;
        let mut value_next = false;

        while i < chars.len() {
            let c = chars[i];
            if c == ' ' {
                i += 1;
                continue;
            }
            if value_next {
                value_next = false;
                match c {
                    '"' | '[' | '{' => {}
                    '#' => {
                        self.comment(&chars, i, line_no);
                        break;
                    }
                    '`' => return self.open_fence(&chars, i, indent, line_no),
                    _ => {
                        i = self.bare_value(&chars, i, line_no)?;
                        continue;
                    }
                }
            }
            match c {
                '#' => {
                    self.comment(&chars, i, line_no);
                    break;
                }
                '"' => i = self.string(&chars, i, line_no)?,
                ':' => {
                    if chars.get(i + 1) == Some(&':') {
                        self.push(TokenKind::AssignOp, "::", line_no, i);
                        i += 2;
                        value_next = true;
                    } else {
                        self.push(TokenKind::Colon, ":", line_no, i);
                        i += 1;
                    }
                }
                '[' => {
                    self.push(TokenKind::LBracket, "[", line_no, i);
                    i += 1;
                }
                ']' => {
                    self.push(TokenKind::RBracket, "]", line_no, i);
                    i += 1;
                }
                '{' => {
                    self.push(TokenKind::LBrace, "{", line_no, i);
                    i += 1;
                }
                '}' => {
                    self.push(TokenKind::RBrace, "}", line_no, i);
                    i += 1;
                }
                ',' => {
                    self.push(TokenKind::Comma, ",", line_no, i);
                    i += 1;
                }
                '=' => {
                    self.push(TokenKind::Equals, "=", line_no, i);
                    i += 1;
                }
                '`' => {
                    let run = chars[i..].iter().take_while(|c| **c == '`').count();
                    if run >= 3 {
                        return Err(LexError::OrphanFence {
                            len: run,
                            line: line_no,
                        });
                    }
                    return Err(LexError::DisallowedChar {
                        ch: '`',
                        line: line_no,
                        column: (i + 1) as u32,
                        hint: "backticks appear only in literal zone fences; \
                               quote inline code as a string",
                    });
                }
                _ if c.is_ascii_digit() || (c == '-' && digit_at(&chars, i + 1)) => {
                    i = self.number(&chars, i, line_no)?;
                }
                _ if is_ident_start(c) => {
                    let start = i;
                    while i < chars.len() && is_ident_continue(chars[i]) {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();
                    self.push(TokenKind::Ident, word, line_no, start);
                }
                _ => {
                    return Err(LexError::DisallowedChar {
                        ch: c,
                        line: line_no,
                        column: (i + 1) as u32,
                        hint: "quote text containing punctuation as a string",
                    })
                }
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Newline, "", line_no, 1));
        Ok(None)
    }

    fn push(&mut self, kind: TokenKind, value: impl Into<String>, line: u32, i: usize) {
        self.tokens
            .push(Token::new(kind, value, line, (i + 1) as u32));
    }

    fn comment(&mut self, chars: &[char], i: usize, line_no: u32) {
        let text: String = chars[i + 1..].iter().collect();
        self.push(TokenKind::Comment, text.trim(), line_no, i);
    }

    /// Quoted string starting at `chars[i] == '"'`. Returns the index one
    /// past the closing quote; the token value is the decoded content.
    fn string(&mut self, chars: &[char], i: usize, line_no: u32) -> Result<usize, LexError> {
        let open = i;
        let mut j = i + 1;
        let mut value = String::new();
        while j < chars.len() {
            match chars[j] {
                '"' => {
                    self.push(TokenKind::Str, value, line_no, open);
                    return Ok(j + 1);
                }
                '\\' => {
                    let esc = chars.get(j + 1).copied();
                    let decoded = match esc {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        _ => {
                            return Err(LexError::DisallowedChar {
                                ch: esc.unwrap_or('\\'),
                                line: line_no,
                                column: (j + 2) as u32,
                                hint: "valid string escapes are \\\\, \\\", \\n, \\r, \\t",
                            })
                        }
                    };
                    value.push(decoded);
                    j += 2;
                }
                other => {
                    value.push(other);
                    j += 1;
                }
            }
        }
        Err(LexError::UnterminatedString {
            line: line_no,
            column: (open + 1) as u32,
        })
    }

    /// Numeric literal starting at `chars[i]`. The lexeme is kept verbatim;
    /// no numeric rewriting happens anywhere downstream either.
    fn number(&mut self, chars: &[char], i: usize, line_no: u32) -> Result<usize, LexError> {
        let start = i;
        let mut j = i;
        if chars[j] == '-' {
            j += 1;
        }
        while digit_at(chars, j) {
            j += 1;
        }
        if chars.get(j) == Some(&'.') && digit_at(chars, j + 1) {
            j += 1;
            while digit_at(chars, j) {
                j += 1;
            }
        }
        if matches!(chars.get(j), Some('e') | Some('E')) {
            let mut k = j + 1;
            if matches!(chars.get(k), Some('+') | Some('-')) {
                k += 1;
            }
            if digit_at(chars, k) {
                j = k;
                while digit_at(chars, j) {
                    j += 1;
                }
            }
        }
        if let Some(&next) = chars.get(j) {
            if is_ident_continue(next) {
                return Err(LexError::DisallowedChar {
                    ch: next,
                    line: line_no,
                    column: (j + 1) as u32,
                    hint: "quote values that mix digits and text",
                });
            }
        }
        let lexeme: String = chars[start..j].iter().collect();
        self.push(TokenKind::Number, lexeme, line_no, start);
        Ok(j)
    }

    /// Bare value after `::`: captured to end of line, or to a
    /// whitespace-preceded `#` comment. Classified as a number token when
    /// the whole run is a numeric lexeme, an identifier otherwise.
    fn bare_value(&mut self, chars: &[char], i: usize, line_no: u32) -> Result<usize, LexError> {
        let mut j = i;
        let mut comment = None;
        while j < chars.len() {
            match chars[j] {
                '#' if chars[j - 1] == ' ' => {
                    comment = Some(j);
                    break;
                }
                '#' => {
                    return Err(LexError::DisallowedChar {
                        ch: '#',
                        line: line_no,
                        column: (j + 1) as u32,
                        hint: "'#' inside a bare value is ambiguous with a comment; \
                               quote the value",
                    })
                }
                '`' => {
                    return Err(LexError::DisallowedChar {
                        ch: '`',
                        line: line_no,
                        column: (j + 1) as u32,
                        hint: "a literal zone fence follows '::' directly; \
                               quote a value containing backticks",
                    })
                }
                '"' => {
                    return Err(LexError::DisallowedChar {
                        ch: '"',
                        line: line_no,
                        column: (j + 1) as u32,
                        hint: "quote the entire value, not part of it",
                    })
                }
                _ => j += 1,
            }
        }
        let cut = comment.unwrap_or(chars.len());
        let raw: String = chars[i..cut].iter().collect();
        let value = raw.trim_end();
        let kind = if waymark_ast::is_number_lexeme(value) {
            TokenKind::Number
        } else {
            TokenKind::Ident
        };
        self.push(kind, value, line_no, i);
        if let Some(at) = comment {
            self.comment(chars, at, line_no);
            return Ok(chars.len());
        }
        Ok(cut)
    }

    /// Opening fence after `::`. Consumes the rest of the line; the zone
    /// body is handled by [`Lexer::zone_line`] until the closing fence.
    fn open_fence(
        &mut self,
        chars: &[char],
        i: usize,
        indent: usize,
        line_no: u32,
    ) -> Result<Option<OpenFence>, LexError> {
        let run = chars[i..].iter().take_while(|c| **c == '`').count();
        if run < 3 {
            return Err(LexError::DisallowedChar {
                ch: '`',
                line: line_no,
                column: (i + 1) as u32,
                hint: "a literal zone opens with at least three backticks",
            });
        }
        let rest: String = chars[i + run..].iter().collect();
        let tag = rest.trim();
        if !tag.chars().all(is_fence_tag_char) {
            return Err(LexError::MalformedFenceInfo {
                line: line_no,
                found: tag.to_string(),
            });
        }
        let mut value = "`".repeat(run);
        value.push_str(tag);
        self.push(TokenKind::FenceOpen, value, line_no, i);
        Ok(Some(OpenFence {
            marker_len: run,
            indent,
            line: line_no,
            span_start: self.text.len(),
            content: Vec::new(),
        }))
    }
}

fn stripped(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn digit_at(chars: &[char], i: usize) -> bool {
    chars.get(i).is_some_and(|c| c.is_ascii_digit())
}

/// `===NAME===` recognition on an already-trimmed line. Name validity is
/// the parser's concern; this only carves out the delimiters.
fn header_name(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix("===")?.strip_suffix("===")?;
    if inner.is_empty() || inner.contains('=') {
        return None;
    }
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(out: &LexOutput) -> Vec<TokenKind> {
        out.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_minimal_document() {
        let out = tokenize("===TASK===\nMETA:\n  TYPE::REQUEST\n===END===\n").unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                TokenKind::DocHeader,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::AssignOp,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::DocEnd,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(out.tokens[5].value, "TYPE");
        assert_eq!(out.tokens[5].column, 3);
        assert_eq!(out.tokens[7].value, "REQUEST");
    }

    #[test]
    fn test_bare_value_runs_to_end_of_line() {
        let out = tokenize("===T===\nMETA:\n  NOTE::two words here\n===END===\n").unwrap();
        let tok = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Ident && t.value.contains(' '))
            .unwrap();
        assert_eq!(tok.value, "two words here");
    }

    #[test]
    fn test_bare_value_with_trailing_comment() {
        let out = tokenize("===T===\nMETA:\n  N::fast # keep\n===END===\n").unwrap();
        let values: Vec<&str> = out.tokens.iter().map(|t| t.value.as_str()).collect();
        assert!(values.contains(&"fast"));
        assert!(values.contains(&"keep"));
        let glued = tokenize("===T===\nMETA:\n  N::fast#keep\n===END===\n");
        assert!(matches!(glued, Err(LexError::DisallowedChar { ch: '#', .. })));
    }

    #[test]
    fn test_numbers_keep_their_lexeme() {
        let out = tokenize("===T===\nMETA:\n  A::007\n  B::-1.50e3\n===END===\n").unwrap();
        let nums: Vec<&str> = out
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(nums, vec!["007", "-1.50e3"]);
    }

    #[test]
    fn test_fence_span_indexes_normalized_buffer() {
        let input = "===T===\nMETA:\n  V::1\nCODE::```python\nhello\n```\n===END===\n";
        let out = tokenize(input).unwrap();
        assert_eq!(out.fence_spans.len(), 1);
        let span = out.fence_spans[0];
        assert_eq!(&out.text[span.start..span.end], "hello");
        assert_eq!(span.open_line, 4);
        assert_eq!(span.close_line, 6);
        assert_eq!(span.marker_len, 3);
        let content = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::LiteralContent)
            .unwrap();
        assert_eq!(content.value, "hello");
    }

    #[test]
    fn test_zone_content_is_verbatim() {
        let input = "===T===\nMETA:\n  V::1\nRAW::```\n\tkeep\ttabs\n  e\u{301} stays\n```\n===END===\n";
        let out = tokenize(input).unwrap();
        let span = out.fence_spans[0];
        assert_eq!(&out.text[span.start..span.end], "\tkeep\ttabs\n  e\u{301} stays");
        assert!(out.notices.is_empty());
    }

    #[test]
    fn test_nfc_applies_outside_zones() {
        let out = tokenize("===T===\nMETA:\n  K::cafe\u{301}\n===END===\n").unwrap();
        assert_eq!(out.notices.len(), 1);
        assert_eq!(out.notices[0].line, 3);
        let tok = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Ident && t.value.starts_with("caf"))
            .unwrap();
        assert_eq!(tok.value, "caf\u{e9}");
    }

    #[test]
    fn test_tab_outside_zone_is_fatal() {
        let err = tokenize("===T===\nMETA:\n\tA::1\n===END===\n").unwrap_err();
        assert!(matches!(
            err,
            LexError::TabOutsideZone { line: 3, column: 1 }
        ));
    }

    #[test]
    fn test_bom_and_crlf_are_stripped() {
        let out = tokenize("\u{feff}===T===\r\nMETA:\r\n  A::1\r\n===END===\r\n").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::DocHeader);
        assert!(!out.text.contains('\r'));
    }

    #[test]
    fn test_unterminated_fence_names_opening_line() {
        let err = tokenize("===T===\nMETA:\n  V::1\nCODE::```\nbody\n===END===\n").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedFence { open_line: 4, .. }
        ));
    }

    #[test]
    fn test_equal_inner_fence_with_trailing_is_ambiguous() {
        let err = tokenize("===T===\nMETA:\n  V::1\nC::```\n``` x\n```\n===END===\n").unwrap_err();
        match err {
            LexError::AmbiguousFence {
                open_len,
                found_len,
                trailing,
                ..
            } => {
                assert_eq!((open_len, found_len, trailing), (3, 3, true));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_longer_inner_fence_is_ambiguous() {
        let err = tokenize("===T===\nMETA:\n  V::1\nC::```\n````\n```\n===END===\n").unwrap_err();
        assert!(matches!(
            err,
            LexError::AmbiguousFence {
                open_len: 3,
                found_len: 4,
                trailing: false,
                ..
            }
        ));
    }

    #[test]
    fn test_shorter_inner_fence_is_content() {
        let input = "===T===\nMETA:\n  V::1\nC::````\n```\ninner\n```\n````\n===END===\n";
        let out = tokenize(input).unwrap();
        let span = out.fence_spans[0];
        assert_eq!(&out.text[span.start..span.end], "```\ninner\n```");
    }

    #[test]
    fn test_orphan_fence_outside_zone_is_fatal() {
        let err = tokenize("===T===\nMETA:\n  V::1\n```\n===END===\n").unwrap_err();
        match err {
            LexError::OrphanFence { len: 3, line: 4 } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_deeply_indented_backticks_inside_zone_are_content() {
        let input = "===T===\nMETA:\n  V::1\nC::```\n      ```\n```\n===END===\n";
        let out = tokenize(input).unwrap();
        let span = out.fence_spans[0];
        assert_eq!(&out.text[span.start..span.end], "      ```");
    }

    #[test]
    fn test_close_fence_tolerates_small_indent() {
        let input = "===T===\nMETA:\n  V::1\nC::```\nbody\n   ```\n===END===\n";
        let out = tokenize(input).unwrap();
        assert_eq!(out.fence_spans.len(), 1);
    }

    #[test]
    fn test_frontmatter_captured_verbatim() {
        let input = "---\ntitle: x\t!\n---\n===T===\nMETA:\n  A::1\n===END===\n";
        let out = tokenize(input).unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::Frontmatter);
        assert_eq!(out.tokens[0].value, "title: x\t!");
        assert_eq!(out.tokens[1].kind, TokenKind::DocHeader);
        assert_eq!(out.tokens[1].line, 4);
    }

    #[test]
    fn test_unterminated_frontmatter_is_fatal() {
        let err = tokenize("---\ntitle: x\n===T===\n===END===\n").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedFrontmatter { open_line: 1 }
        ));
    }

    #[test]
    fn test_string_escapes_decode() {
        let out = tokenize("===T===\nMETA:\n  S::\"a\\n\\\"b\\\\\"\n===END===\n").unwrap();
        let tok = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Str)
            .unwrap();
        assert_eq!(tok.value, "a\n\"b\\");
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let err = tokenize("===T===\nMETA:\n  S::\"open\n===END===\n").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedString { line: 3, column: 6 }
        ));
    }

    #[test]
    fn test_list_and_map_lines_tokenize() {
        let out =
            tokenize("===T===\nMETA:\n  A::1\nxs::[1, \"two\"]\ncfg::{a=1, b=x}\n===END===\n")
                .unwrap();
        let kinds = kinds(&out);
        assert!(kinds.contains(&TokenKind::LBracket));
        assert!(kinds.contains(&TokenKind::Comma));
        assert!(kinds.contains(&TokenKind::LBrace));
        assert!(kinds.contains(&TokenKind::Equals));
    }

    #[test]
    fn test_malformed_fence_info_rejected() {
        let err = tokenize("===T===\nMETA:\n  A::1\nC::```py thon\n```\n===END===\n").unwrap_err();
        assert!(matches!(err, LexError::MalformedFenceInfo { line: 4, .. }));
    }
}
