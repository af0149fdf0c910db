use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Symbol,
    Number,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Number => "NUMBER",
            TokenKind::End => "END",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Only present for `TokenKind::Number`.
    pub literal: Option<f64>,
    pub line: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: &str, line: usize) -> Self {
        Self {
            kind,
            lexeme: String::from(lexeme),
            literal: None,
            line,
        }
    }

    fn end(line: usize) -> Self {
        Self::new(TokenKind::End, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line: {}, lexeme: {}", self.kind, self.line, self.lexeme)?;
        if let Some(literal) = self.literal {
            write!(f, " literal: {}", literal)?;
        }
        Ok(())
    }
}

lazy_static! {
    // A trailing '.' without a digit after it is left for the next token.
    static ref NUMBER_RE: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)?").unwrap();
    static ref SYMBOL_RE: Regex = Regex::new(r"^[^ \t\r\n)]+").unwrap();
}

/// Splits `source` into tokens. Never fails: any character that isn't a
/// paren, whitespace or a digit starts a symbol. The result always ends with
/// a `TokenKind::End` token.
pub fn scan(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        let consumed = match c {
            '(' => push(&mut tokens, Token::new(TokenKind::LeftParen, "(", line)),
            ')' => push(&mut tokens, Token::new(TokenKind::RightParen, ")", line)),
            ' ' | '\t' | '\r' => 1,
            '\n' => {
                line += 1;
                1
            }
            '0'..='9' => push(&mut tokens, scan_number(rest, line)),
            _ => push(&mut tokens, scan_symbol(rest, c, line)),
        };
        rest = &rest[consumed..];
    }
    tokens.push(Token::end(line));
    tokens
}

fn push(tokens: &mut Vec<Token>, token: Token) -> usize {
    log::trace!("scanned {}", token);
    let consumed = token.lexeme.len();
    tokens.push(token);
    consumed
}

fn scan_number(rest: &str, line: usize) -> Token {
    let digits = NUMBER_RE.find(rest).map_or(&rest[..1], |m| m.as_str());
    let mut token = Token::new(TokenKind::Number, digits, line);
    token.literal = digits.parse().ok();
    token
}

fn scan_symbol(rest: &str, first: char, line: usize) -> Token {
    let chars = SYMBOL_RE
        .find(rest)
        .map_or(&rest[..first.len_utf8()], |m| m.as_str());
    Token::new(TokenKind::Symbol, chars, line)
}
