use cursor::{Cursor, Line};
use errors::{CompileError, CompileErrors, Location};

pub mod token;
pub use token::{Token, TokenData};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

/// Output of a full scan. Scanning never stops at the first error, so the token list is
/// complete (and `Eof`-terminated) even when `errors` is non-empty.
#[derive(Debug, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: CompileErrors,
}

impl<'a> Scanned<'a> {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<Token<'a>>, CompileErrors> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

pub fn tokenize(source: &str) -> Scanned<'_> {
    Scanner::new(source).scan_tokens()
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: CompileErrors,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self {
            start: cursor.clone(),
            current: cursor,
            tokens: Vec::new(),
            errors: CompileErrors::default(),
        }
    }

    pub fn scan_tokens(mut self) -> Scanned<'a> {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => self.add_token_if_matches('=', BangEqual, Bang),
                '=' => self.add_token_if_matches('=', EqualEqual, Equal),
                '<' => self.add_token_if_matches('=', LessEqual, Less),
                '>' => self.add_token_if_matches('=', GreaterEqual, Greater),

                '/' => {
                    if self.current.consume_if('/') {
                        // Comment
                        self.current.consume_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                c if is_identifier_start(c) => self.identifier(),

                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(self.current.line(), ScanError::UnexpectedCharacter(c)),
            }
        }

        self.tokens.push(Token::eof(self.current.line()));
        log::trace!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());

        Scanned { tokens: self.tokens, errors: self.errors }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        self.tokens.push(Token::new(data, self.lexeme(), self.start.line()))
    }

    fn add_token_if_matches(&mut self, expected: char, matched: TokenData<'a>, single: TokenData<'a>) {
        if self.current.consume_if(expected) {
            self.add_token(matched)
        } else {
            self.add_token(single)
        }
    }

    fn error(&mut self, line: Line, error: ScanError) {
        log::debug!("Scan error on line {line}: {error}");
        self.errors.push(CompileError {
            line,
            location: Location::Unspecified,
            message: error.to_string(),
        });
    }

    fn string(&mut self) {
        self.current.consume_while(|c| c != '"');

        if !self.current.consume_if('"') {
            // Reported where the source ran out; scanning resumes at the end of input.
            self.error(self.current.line(), ScanError::UnterminatedString);
            return;
        }

        let lexeme = self.lexeme();
        self.add_token(Str(&lexeme[1..lexeme.len() - 1]));
    }

    fn number(&mut self) {
        self.current.consume_while(|c| c.is_ascii_digit());

        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.consume_while(|c| c.is_ascii_digit());
        }

        let value = self
            .lexeme()
            .parse()
            .unwrap_or_else(|_| unreachable!("A run of ASCII digits is always a valid f64"));
        self.add_token(Number(value));
    }

    fn identifier(&mut self) {
        self.current.consume_while(is_identifier_char);
        self.add_token(TokenData::keyword(self.lexeme()).unwrap_or(Identifier));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}
