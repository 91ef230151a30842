//! Tokenizer for the block directive grammar

use crate::error::{Error, Result};

/// A single token with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text, with quotes and escapes removed
    pub text: String,
    /// Line the token starts on (1-based)
    pub line: usize,
    /// Line the token ends on; differs from `line` for multi-line quoted tokens
    pub end_line: usize,
    /// Whether the token was written as a quoted string
    pub quoted: bool,
}

impl Token {
    /// Whether this token is an unquoted `{`
    pub fn is_block_open(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    /// Whether this token is an unquoted `}`
    pub fn is_block_close(&self) -> bool {
        !self.quoted && self.text == "}"
    }
}

/// Split `input` into tokens
///
/// Tokens are separated by whitespace. A `#` at the start of a token begins a
/// comment running to the end of the line. A `"` at the start of a token
/// begins a quoted string in which `\"` is a literal quote.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        if c == '\n' {
            line += 1;
            chars.next();
            continue;
        }

        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '#' {
            while let Some(&c) = chars.peek() {
                if c == '\n' {
                    break;
                }
                chars.next();
            }
            continue;
        }

        if c == '"' {
            chars.next();
            let start = line;
            let mut text = String::new();
            let mut closed = false;

            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' if chars.peek() == Some(&'"') => {
                        text.push('"');
                        chars.next();
                    }
                    '\n' => {
                        line += 1;
                        text.push(c);
                    }
                    _ => text.push(c),
                }
            }

            if !closed {
                return Err(Error::directive(start, "unterminated quoted string"));
            }

            tokens.push(Token {
                text,
                line: start,
                end_line: line,
                quoted: true,
            });
            continue;
        }

        let mut text = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            chars.next();
        }

        tokens.push(Token {
            text,
            line,
            end_line: line,
            quoted: false,
        });
    }

    Ok(tokens)
}
