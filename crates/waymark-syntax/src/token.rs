use std::fmt;

/// Lexical token kinds. The enumeration is closed: adding a kind is a
/// breaking change that every `match` in the parser must acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Raw frontmatter captured between the `---` delimiters; the value is
    /// the inner text, verbatim.
    Frontmatter,
    /// `===NAME===` header; the value is the name between the markers.
    DocHeader,
    /// `===END===` terminator.
    DocEnd,
    /// Identifier, key, or bare scalar text.
    Ident,
    /// Quoted string; the value is the decoded text.
    Str,
    /// Number lexeme, e.g. `-3`, `1.50`, `2e8`.
    Number,
    /// The assignment operator `::`.
    AssignOp,
    /// The block colon `:`.
    Colon,
    /// `,` separating list or map entries.
    Comma,
    /// `=` between inline map key and value.
    Equals,
    /// `[` opening a list.
    LBracket,
    /// `]` closing a list.
    RBracket,
    /// `{` opening an inline map.
    LBrace,
    /// `}` closing an inline map.
    RBrace,
    /// `#` comment; the value is the trimmed text after the marker.
    Comment,
    /// Opening fence line; the value is the marker plus optional info tag,
    /// e.g. ```` ```python ````.
    FenceOpen,
    /// Literal zone payload, byte-exact. Always followed by [`FenceClose`];
    /// the zone interior carries no [`Newline`] tokens.
    ///
    /// [`FenceClose`]: TokenKind::FenceClose
    /// [`Newline`]: TokenKind::Newline
    LiteralContent,
    /// Closing fence; the value is the marker.
    FenceClose,
    /// End of a logical line.
    Newline,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Frontmatter => "frontmatter",
            TokenKind::DocHeader => "document header",
            TokenKind::DocEnd => "'===END==='",
            TokenKind::Ident => "identifier",
            TokenKind::Str => "string",
            TokenKind::Number => "number",
            TokenKind::AssignOp => "'::'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Equals => "'='",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comment => "comment",
            TokenKind::FenceOpen => "fence open",
            TokenKind::LiteralContent => "literal content",
            TokenKind::FenceClose => "fence close",
            TokenKind::Newline => "end of line",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", name)
    }
}

/// One lexical token with its position (1-based line; 1-based character
/// column within the normalized line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Token payload; see the kind's documentation for its meaning.
    pub value: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based character column.
    pub column: u32,
}

impl Token {
    /// Constructs a token.
    pub fn new(kind: TokenKind, value: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }
}
