use std::fmt;

use thiserror::Error;

/// Stable error code: a family shared by related failures plus a sub-code
/// distinguishing the exact kind. Families span pipeline stages — `UNCLOSED`
/// covers an unterminated string at lex time and an unterminated list at
/// parse time — so dashboards can group without string-matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Family shared by related failures, e.g. `UNCLOSED`.
    pub family: &'static str,
    /// Sub-code naming the exact failure, e.g. `LITERAL_ZONE`.
    pub sub: &'static str,
}

impl ErrorCode {
    /// Constructs a code pair.
    pub const fn new(family: &'static str, sub: &'static str) -> Self {
        Self { family, sub }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.sub)
    }
}

/// Lexical errors. Fatal: no token stream is produced.
///
/// Every message names what was found and how to fix it; `code()` exposes
/// the stable family/sub pair for programmatic handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Tab character outside a literal zone or frontmatter.
    #[error(
        "tab character at line {line}, column {column}: tabs are not allowed \
         outside literal zones; replace it with spaces"
    )]
    TabOutsideZone {
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
    },
    /// A character that cannot appear at this position.
    #[error("unexpected character {ch:?} at line {line}, column {column}: {hint}")]
    DisallowedChar {
        /// The offending character.
        ch: char,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        /// How to fix the input.
        hint: &'static str,
    },
    /// Extra text on an opening fence line after the info tag.
    #[error(
        "malformed fence info tag {found:?} at line {line}: an opening fence \
         takes at most one word (letters, digits, '_', '+', '-', '.') and \
         nothing else"
    )]
    MalformedFenceInfo {
        /// 1-based line.
        line: u32,
        /// The rejected tag text.
        found: String,
    },
    /// A quoted string with no closing quote on its line.
    #[error(
        "string opened at line {line}, column {column} has no closing quote \
         before the end of the line; add '\"'"
    )]
    UnterminatedString {
        /// 1-based line.
        line: u32,
        /// 1-based column of the opening quote.
        column: u32,
    },
    /// Frontmatter opened at line 1 but never closed.
    #[error(
        "frontmatter opened at line {open_line} is never closed; add a \
         closing '---' line"
    )]
    UnterminatedFrontmatter {
        /// Line of the opening delimiter (always 1).
        open_line: u32,
    },
    /// A literal zone fence with no closing fence before end of input.
    #[error(
        "literal zone opened at line {open_line} with {marker} is never \
         closed; add a closing fence of {} backticks",
        .marker.len()
    )]
    UnterminatedFence {
        /// The opening marker, e.g. ```` ``` ````.
        marker: String,
        /// Line of the opening fence.
        open_line: u32,
    },
    /// A fence line inside a zone that can neither close it nor be content.
    #[error(
        "ambiguous fence at line {line}: the zone opened at line {open_line} \
         uses {open_len} backticks and this line carries {found_len}{}; use \
         an opening fence of at least {} backticks to wrap it as content",
        if *.trailing { " followed by content" } else { "" },
        (*.found_len).max(*.open_len) + 1
    )]
    AmbiguousFence {
        /// Length of the zone's opening marker.
        open_len: usize,
        /// Length of the conflicting run.
        found_len: usize,
        /// Line of the opening fence.
        open_line: u32,
        /// Line of the conflicting run.
        line: u32,
        /// True when the run matched the opening length but trailing
        /// content prevented it from closing the zone.
        trailing: bool,
    },
    /// A fence line outside any literal zone.
    #[error(
        "backtick fence of length {len} at line {line} sits outside any \
         literal zone; fences open only immediately after '::' — if this \
         line was meant to sit inside the zone above, lengthen that zone's \
         opening fence to at least {} backticks",
        .len + 1
    )]
    OrphanFence {
        /// Length of the stray run.
        len: usize,
        /// 1-based line.
        line: u32,
    },
}

impl LexError {
    /// The stable family/sub code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LexError::TabOutsideZone { .. } => ErrorCode::new("ILLEGAL_CHAR", "TAB"),
            LexError::DisallowedChar { .. } => ErrorCode::new("ILLEGAL_CHAR", "CHAR"),
            LexError::MalformedFenceInfo { .. } => ErrorCode::new("ILLEGAL_CHAR", "FENCE_INFO"),
            LexError::UnterminatedString { .. } => ErrorCode::new("UNCLOSED", "STRING"),
            LexError::UnterminatedFrontmatter { .. } => ErrorCode::new("UNCLOSED", "FRONTMATTER"),
            LexError::UnterminatedFence { .. } => ErrorCode::new("UNCLOSED", "LITERAL_ZONE"),
            LexError::AmbiguousFence { trailing: true, .. } => {
                ErrorCode::new("AMBIGUOUS_FENCE", "EQUAL_WITH_TRAILING")
            }
            LexError::AmbiguousFence { trailing: false, .. } => {
                ErrorCode::new("AMBIGUOUS_FENCE", "LONGER_RUN")
            }
            LexError::OrphanFence { .. } => ErrorCode::new("AMBIGUOUS_FENCE", "OUTSIDE_ZONE"),
        }
    }
}

/// Structural errors. Fatal: no partial tree is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input does not start with a `===NAME===` header.
    #[error("expected a '===NAME===' document header at line {line}")]
    MissingHeader {
        /// 1-based line.
        line: u32,
    },
    /// Header name outside `[A-Z_][A-Z0-9_]*`.
    #[error(
        "invalid document name {name:?} at line {line}: names match \
         [A-Z_][A-Z0-9_]* (uppercase letters, digits, underscores)"
    )]
    InvalidDocumentName {
        /// The rejected name.
        name: String,
        /// 1-based line.
        line: u32,
    },
    /// No `META:` section after the header.
    #[error("expected 'META:' at line {line}, immediately after the document header")]
    MissingMeta {
        /// 1-based line.
        line: u32,
    },
    /// META may hold assignments only.
    #[error(
        "META holds assignments only; {key:?} opens a nested container — \
         move it into the document body"
    )]
    MetaContainer {
        /// Key of the offending container.
        key: String,
    },
    /// A key outside `[A-Za-z_][A-Za-z0-9_]*`.
    #[error(
        "invalid key {key:?} at line {line}: keys match [A-Za-z_][A-Za-z0-9_]*"
    )]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// 1-based line.
        line: u32,
    },
    /// The same key bound twice in one container.
    #[error(
        "duplicate key {key:?} at line {line}: already bound at line \
         {first_line}; a container cannot carry the same key twice"
    )]
    DuplicateKey {
        /// The duplicated key.
        key: String,
        /// Line of the second binding.
        line: u32,
        /// Line of the first binding.
        first_line: u32,
    },
    /// A line indented where no open container expects it.
    #[error(
        "indentation of {width} spaces at line {line} does not match the \
         open block, which expects {expected}; align the line with its \
         siblings"
    )]
    IndentMismatch {
        /// 1-based line.
        line: u32,
        /// Found indentation width.
        width: usize,
        /// Width the enclosing container expects.
        expected: usize,
    },
    /// Extra tokens after an assignment's value.
    #[error(
        "trailing content after the value of {key:?} at line {line}, column \
         {column}; remove it or quote the whole value"
    )]
    MalformedAssignment {
        /// Key of the assignment.
        key: String,
        /// 1-based line.
        line: u32,
        /// 1-based column of the first trailing token.
        column: u32,
    },
    /// A list with no `]` before the end of its line.
    #[error(
        "list opened at line {line}, column {column} has no closing ']' \
         before the end of the line"
    )]
    UnclosedList {
        /// Line of the opening bracket.
        line: u32,
        /// Column of the opening bracket.
        column: u32,
    },
    /// An inline map with no `}` before the end of its line.
    #[error(
        "inline map opened at line {line}, column {column} has no closing \
         '}}' before the end of the line"
    )]
    UnclosedInlineMap {
        /// Line of the opening brace.
        line: u32,
        /// Column of the opening brace.
        column: u32,
    },
    /// Inline map values must stay atomic.
    #[error(
        "inline map value for {key:?} at line {line}, column {column} is a \
         nested collection; inline maps hold scalars only — use a block"
    )]
    NonAtomicMapValue {
        /// Key of the offending entry.
        key: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
    },
    /// Some other token where a specific one was required.
    #[error("expected {expected} at line {line}, column {column}, found {found}")]
    UnexpectedToken {
        /// Description of what was required.
        expected: &'static str,
        /// Human name of the found token.
        found: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
    },
    /// Input ended without `===END===`.
    #[error("expected '===END===' before the end of input (document starts at line {line})")]
    MissingEnd {
        /// Line the document header sits on.
        line: u32,
    },
    /// Content after `===END===`.
    #[error("trailing content at line {line}: nothing may follow '===END==='")]
    TrailingContent {
        /// 1-based line.
        line: u32,
    },
    /// A fence token triple arrived broken from the lexer. This is a defect
    /// in the lexer/parser contract, never an input error.
    #[error(
        "internal defect: fence tokens near line {line} are unbalanced; the \
         lexer guarantees FENCE_OPEN/LITERAL_CONTENT/FENCE_CLOSE triples"
    )]
    FenceImbalance {
        /// Line of the fence opening.
        line: u32,
    },
}

impl ParseError {
    /// The stable family/sub code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::MissingHeader { .. } => ErrorCode::new("STRUCTURE", "MISSING_HEADER"),
            ParseError::InvalidDocumentName { .. } => ErrorCode::new("STRUCTURE", "DOCUMENT_NAME"),
            ParseError::MissingMeta { .. } => ErrorCode::new("STRUCTURE", "MISSING_META"),
            ParseError::MetaContainer { .. } => ErrorCode::new("STRUCTURE", "META"),
            ParseError::InvalidKey { .. } => ErrorCode::new("STRUCTURE", "KEY"),
            ParseError::DuplicateKey { .. } => ErrorCode::new("STRUCTURE", "DUPLICATE_KEY"),
            ParseError::IndentMismatch { .. } => ErrorCode::new("STRUCTURE", "INDENTATION"),
            ParseError::MalformedAssignment { .. } => ErrorCode::new("STRUCTURE", "ASSIGNMENT"),
            ParseError::UnclosedList { .. } => ErrorCode::new("UNCLOSED", "LIST"),
            ParseError::UnclosedInlineMap { .. } => ErrorCode::new("UNCLOSED", "INLINE_MAP"),
            ParseError::NonAtomicMapValue { .. } => ErrorCode::new("STRUCTURE", "MAP_VALUE"),
            ParseError::UnexpectedToken { .. } => ErrorCode::new("STRUCTURE", "UNEXPECTED_TOKEN"),
            ParseError::MissingEnd { .. } => ErrorCode::new("UNCLOSED", "DOCUMENT"),
            ParseError::TrailingContent { .. } => ErrorCode::new("STRUCTURE", "TRAILING_CONTENT"),
            ParseError::FenceImbalance { .. } => ErrorCode::new("INTERNAL", "FENCE_BALANCE"),
        }
    }
}
