use crate::tokens::{scan, Token, TokenKind};
use crate::types::{AtomValue, Expression, Symbol};
use std::fmt;
use std::iter::Peekable;
use std::rc::Rc;
use std::vec;

type Reader = Peekable<vec::IntoIter<Token>>;

pub type Result<T = Vec<Expression>> = std::result::Result<T, ParseError>;

#[derive(Debug, PartialEq)]
pub enum ParseError {
    UnexpectedToken { lexeme: String, line: usize },
    /// `line` is where the collection was opened.
    UnterminatedCollection { line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. } => *line,
            ParseError::UnterminatedCollection { line } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { lexeme, line } => {
                write!(f, "line {}: unexpected token '{}'", line, lexeme)
            }
            ParseError::UnterminatedCollection { line } => {
                write!(f, "line {}: missing ')' to close collection", line)
            }
        }
    }
}

pub fn read_str(input: &str) -> Result {
    parse(scan(input))
}

/// Parses every top-level expression in `tokens`.
pub fn parse(tokens: Vec<Token>) -> Result {
    let mut reader = tokens.into_iter().peekable();
    let mut expressions = Vec::new();
    while !at_end(&mut reader) {
        expressions.push(read_form(&mut reader)?);
    }
    Ok(expressions)
}

fn at_end(reader: &mut Reader) -> bool {
    match reader.peek() {
        Some(token) => token.kind == TokenKind::End,
        None => true,
    }
}

fn read_form(reader: &mut Reader) -> Result<Expression> {
    // Callers check at_end first, so there is always a token here.
    let token = match reader.next() {
        Some(token) => token,
        None => return Err(ParseError::UnterminatedCollection { line: 0 }),
    };
    match token.kind {
        TokenKind::LeftParen => read_collection(reader, token),
        TokenKind::Number => {
            let value = token.literal.unwrap_or_default();
            Ok(Expression::atom(AtomValue::Number(value), Some(Rc::new(token))))
        }
        TokenKind::Symbol => {
            let name = Symbol(token.lexeme.clone());
            Ok(Expression::atom(AtomValue::Symbol(name), Some(Rc::new(token))))
        }
        TokenKind::RightParen | TokenKind::End => Err(ParseError::UnexpectedToken {
            lexeme: token.lexeme,
            line: token.line,
        }),
    }
}

fn read_collection(reader: &mut Reader, open: Token) -> Result<Expression> {
    let mut elements = Vec::new();
    loop {
        if at_end(reader) {
            return Err(ParseError::UnterminatedCollection { line: open.line });
        }
        if let Some(Token {
            kind: TokenKind::RightParen,
            ..
        }) = reader.peek()
        {
            reader.next();
            break;
        }
        elements.push(read_form(reader)?);
    }
    log::trace!("read collection of {} opened on line {}", elements.len(), open.line);
    Ok(Expression::wrap_collection(elements, Some(Rc::new(open))))
}
