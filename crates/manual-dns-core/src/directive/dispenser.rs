//! Cursor over the tokens of one directive

use super::lexer::{Token, tokenize};
use crate::error::{Error, Result};

/// Walks the tokens of a directive and its block
///
/// The cursor starts before the first token; call [`Dispenser::next`] to
/// load the directive name. Typical use by a provider:
///
/// ```rust
/// # use manual_dns_core::directive::Dispenser;
/// # fn main() -> manual_dns_core::Result<()> {
/// let mut d = Dispenser::from_text("example 1 {\n  option on\n}")?;
/// while d.next() {
///     if d.next_arg() {
///         assert_eq!(d.val(), "1");
///     }
///     let nesting = d.nesting();
///     while d.next_block(nesting) {
///         match d.val() {
///             "option" => { d.next_arg(); }
///             other => return Err(d.err(format!("unrecognized subdirective '{}'", other))),
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    /// Index of the current token; -1 before the first call to `next`
    cursor: isize,
    nesting: usize,
}

impl Dispenser {
    /// Create a dispenser over already lexed tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: -1,
            nesting: 0,
        }
    }

    /// Lex `input` and dispense all of its tokens
    pub fn from_text(input: &str) -> Result<Self> {
        Ok(Self::new(tokenize(input)?))
    }

    /// Name of the directive (the first token), if any
    pub fn directive_name(&self) -> Option<&str> {
        self.tokens.first().map(|t| t.text.as_str())
    }

    /// Advance to the next token, crossing lines and blocks
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.tokens.len() as isize {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Advance to the next token only if it is an argument on the current line
    ///
    /// A block opening `{` is never an argument.
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        if self.current().is_some_and(Token::is_block_open) {
            self.cursor -= 1;
            return false;
        }
        true
    }

    /// Advance through a block opened at `initial_nesting`
    ///
    /// Returns `true` while positioned on a token inside the block. Enters
    /// the block when the current line ends in `{`, and consumes the closing
    /// `}` on exit.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.next() {
                return false;
            }
            if self.current().is_some_and(Token::is_block_close) {
                self.nesting -= 1;
                return false;
            }
            if self.current().is_some_and(Token::is_block_open) {
                self.nesting += 1;
            }
            return self.nesting > initial_nesting;
        }

        if !self.next_on_same_line() {
            return false;
        }
        if !self.current().is_some_and(Token::is_block_open) {
            self.cursor -= 1;
            return false;
        }
        if !self.next() {
            return false;
        }
        if self.current().is_some_and(Token::is_block_close) {
            // "{ }" with nothing inside
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Current block depth
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Text of the current token, or `""` before the first token
    pub fn val(&self) -> &str {
        self.current().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// Line of the current token, or 0 before the first token
    pub fn line(&self) -> usize {
        self.current().map(|t| t.line).unwrap_or(0)
    }

    /// Error for a wrong number of arguments at the current token
    pub fn arg_err(&self) -> Error {
        Error::directive(
            self.line(),
            format!("wrong argument count or unexpected line ending after '{}'", self.val()),
        )
    }

    /// Error with a custom message at the current token
    pub fn err(&self, msg: impl Into<String>) -> Error {
        Error::directive(self.line(), msg)
    }

    fn current(&self) -> Option<&Token> {
        usize::try_from(self.cursor).ok().and_then(|i| self.tokens.get(i))
    }

    fn next_on_same_line(&mut self) -> bool {
        if self.cursor < 0 {
            return self.next();
        }
        let idx = self.cursor as usize;
        match (self.tokens.get(idx), self.tokens.get(idx + 1)) {
            (Some(curr), Some(next)) if curr.end_line == next.line => {
                self.cursor += 1;
                true
            }
            _ => false,
        }
    }
}

/// Split `input` into one dispenser per top-level directive
///
/// A directive starts with a token at block depth zero on a new line and
/// owns every following token up to the next such token, including its
/// block.
pub fn parse_directives(input: &str) -> Result<Vec<Dispenser>> {
    let tokens = tokenize(input)?;
    let mut segments: Vec<Vec<Token>> = Vec::new();
    let mut depth = 0usize;
    let mut open_lines = Vec::new();
    let mut last_line = 0;

    for token in tokens {
        if token.is_block_close() {
            if depth == 0 {
                return Err(Error::directive(token.line, "unexpected '}'"));
            }
            depth -= 1;
            open_lines.pop();
        }

        let starts_directive = depth == 0 && (segments.is_empty() || token.line > last_line);
        if starts_directive && !token.is_block_close() {
            if token.is_block_open() {
                return Err(Error::directive(token.line, "expected directive name before '{'"));
            }
            segments.push(Vec::new());
        }

        if token.is_block_open() {
            depth += 1;
            open_lines.push(token.line);
        }

        last_line = token.end_line;
        if let Some(segment) = segments.last_mut() {
            segment.push(token);
        }
    }

    if let Some(line) = open_lines.last() {
        return Err(Error::directive(*line, "unclosed block"));
    }

    Ok(segments.into_iter().map(Dispenser::new).collect())
}
