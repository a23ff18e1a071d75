use std::fmt::{self, Display, Formatter};

use cursor::Line;
use errors::{CompileError, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub lexeme: &'a str,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, lexeme: &'a str, line: Line) -> Self {
        Self { data, lexeme, line }
    }

    pub fn eof(line: Line) -> Self {
        Self::new(TokenData::Eof, "", line)
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn is_eof(&self) -> bool {
        self.data == TokenData::Eof
    }

    /// Builds a diagnostic pointing at this token.
    pub fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError {
            line: self.line,
            location: if self.is_eof() {
                Location::End
            } else {
                Location::Lexeme(self.lexeme.to_string())
            },
            message: message.into(),
        }
    }
}

/// `TYPE LEXEME LITERAL`, e.g. `NUMBER 42 42.0` or `LEFT_PAREN ( null`.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.data, self.lexeme)?;
        match self.data {
            TokenData::Str(s) => write!(f, "{s}"),
            TokenData::Number(n) if n.fract() == 0.0 => write!(f, "{n:.1}"),
            TokenData::Number(n) => write!(f, "{n}"),
            _ => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    #[strum(serialize = "STRING")]
    Str(&'a str),
    Number(f64),

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenData<'_> {
    pub fn keyword(identifier: &str) -> Option<Self> {
        use TokenData::*;
        Some(match identifier {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}
