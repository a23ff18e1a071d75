mod expr;
mod stmt;
use std::fmt::{self, Display, Formatter};

use errors::{CompileError, CompileErrors};
pub use expr::{BinaryOp, Expr, LiteralValue, UnaryOp};
use scanner::{Token, TokenData};
pub use stmt::Stmt;

use TokenData::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { token, error }
    }
}

impl<'a> From<ParserError<'a>> for CompileError {
    fn from(error: ParserError<'a>) -> Self {
        error.token.error(error.error.to_string())
    }
}

impl<'a> From<ParserError<'a>> for CompileErrors {
    fn from(error: ParserError<'a>) -> Self {
        CompileError::from(error).into()
    }
}

impl Display for ParserError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.error(self.error.to_string()))
    }
}

impl std::error::Error for ParserError<'_> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParserErrorType {
    MissingRightParen,
    ExpectedExpression,
    ExpectedSemicolonAfterValue,
    ExpectedSemicolonAfterExpression,
    ExpectedSemicolonAfterVarDeclaration,
    ExpectedVariableName,
    ExpectedRightBrace,
    InvalidAssignmentTarget,
    TooMuchNesting,
}

impl Display for ParserErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParserErrorType::MissingRightParen => "Expect ')' after expression.",
                ParserErrorType::ExpectedExpression => "Expect expression.",
                ParserErrorType::ExpectedSemicolonAfterValue => "Expect ';' after value.",
                ParserErrorType::ExpectedSemicolonAfterExpression => "Expect ';' after expression.",
                ParserErrorType::ExpectedSemicolonAfterVarDeclaration => {
                    "Expect ';' after variable declaration."
                }
                ParserErrorType::ExpectedVariableName => "Expect variable name.",
                ParserErrorType::ExpectedRightBrace => "Expect '}' after block.",
                ParserErrorType::InvalidAssignmentTarget => "Invalid assignment target.",
                ParserErrorType::TooMuchNesting => "Too much nesting.",
            }
        )
    }
}

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

/// Deepest syntax tree the parser builds. Parsing, evaluating and dropping a tree all
/// recurse on its depth.
const MAX_NESTING: usize = 128;

/// Parses a whole program. Stops at the first syntax error.
pub fn parse_program<'a>(tokens: Vec<Token<'a>>) -> Result<'a, Vec<Stmt<'a>>> {
    Parser::new(tokens).parse_program()
}

/// Parses a single expression. Tokens after the expression are ignored.
pub fn parse_expression<'a>(tokens: Vec<Token<'a>>) -> Result<'a, Expr<'a>> {
    Parser::new(tokens).parse_expression()
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map(Token::line).unwrap_or_default();
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0, depth: 0 }
    }

    pub fn parse_program(mut self) -> Result<'a, Vec<Stmt<'a>>> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            let stmt = self.declaration()?;
            log::trace!("Parsed statement: {:?}", stmt);
            stmts.push(stmt);
        }
        log::debug!("Parsed {} top-level statements", stmts.len());
        Ok(stmts)
    }

    pub fn parse_expression(mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        log::debug!("Parsed expression: {}", expr);
        Ok(expr)
    }

    fn declaration(&mut self) -> Result<'a, Stmt<'a>> {
        if self.consume(Var).is_ok() {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> Result<'a, Stmt<'a>> {
        let name = self.consume_or_error(Identifier, ParserErrorType::ExpectedVariableName)?;

        let initializer = match self.consume(Equal) {
            Ok(_) => Some(self.expression()?),
            Err(_) => None,
        };

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfterVarDeclaration)?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<'a, Stmt<'a>> {
        if self.consume(Print).is_ok() {
            return self.print_statement();
        }

        if self.consume(LeftBrace).is_ok() {
            return self.nested(Self::block);
        }

        self.expression_statement()
    }

    fn block(&mut self) -> Result<'a, Stmt<'a>> {
        let mut stmts = Vec::new();

        while !matches!(self.peek(), RightBrace | Eof) {
            stmts.push(self.declaration()?);
        }

        self.consume_or_error(RightBrace, ParserErrorType::ExpectedRightBrace)?;
        Ok(Stmt::Block(stmts))
    }

    fn print_statement(&mut self) -> Result<'a, Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfterValue)?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<'a, Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorType::ExpectedSemicolonAfterExpression)?;

        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.equality()?;

        if let Ok(equal) = self.consume(Equal) {
            let value = Box::new(self.nested(Self::assignment)?);

            if let Expr::Variable(name) = expr {
                return Ok(Expr::Assign { name, value });
            }

            return Err(ParserError::new(ParserErrorType::InvalidAssignmentTarget, equal));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[EqualEqual, BangEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Plus, Minus], Self::factor)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Star, Slash], Self::unary)
    }

    /// One left-associative precedence level: `operand (operator operand)*`.
    fn binary(
        &mut self,
        operators: &[TokenData<'static>],
        mut operand: impl FnMut(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let mut expr = operand(self)?;

        let mut chain = 0;
        while let Some(operator) = self.consume_binary_operator(operators) {
            // Each operator nests everything parsed so far one level deeper
            chain += 1;
            self.check_nesting(self.depth + chain)?;
            let right = Box::new(operand(self)?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = UnaryOp::from_token(self.peek()) {
            self.advance();
            let right = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek_token().clone();
        let data = token.data;
        let expr = match data {
            False => Expr::Literal(LiteralValue::Boolean(false)),
            True => Expr::Literal(LiteralValue::Boolean(true)),
            Nil => Expr::Literal(LiteralValue::Nil),
            Str(s) => Expr::Literal(LiteralValue::Str(s)),
            Number(n) => Expr::Literal(LiteralValue::Number(n)),
            LeftParen => {
                self.advance();
                let expr = self.nested(Self::expression)?;

                self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;

                return Ok(Expr::Grouping(Box::new(expr)));
            }
            Identifier => Expr::Variable(token),

            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        };
        self.advance();
        Ok(expr)
    }
}

// Helpers
impl<'a> Parser<'a> {
    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<'a, T>) -> Result<'a, T> {
        self.check_nesting(self.depth + 1)?;
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn check_nesting(&self, depth: usize) -> Result<'a, ()> {
        if depth > MAX_NESTING {
            log::debug!("Nesting depth {} exceeds {}", depth, MAX_NESTING);
            return Err(ParserError::new(
                ParserErrorType::TooMuchNesting,
                self.peek_token().clone(),
            ));
        }
        Ok(())
    }

    /// Advances past the next token if it is `data`, otherwise returns the token found instead.
    fn consume(&mut self, data: TokenData) -> std::result::Result<Token<'a>, Token<'a>> {
        debug_assert!(!matches!(data, Number(_) | Str(_)));
        if *self.peek() == data {
            Ok(self.advance())
        } else {
            Err(self.peek_token().clone())
        }
    }

    fn consume_or_error(
        &mut self,
        data: TokenData,
        error_type: ParserErrorType,
    ) -> Result<'a, Token<'a>> {
        self.consume(data).map_err(|token| ParserError::new(error_type, token))
    }

    fn consume_binary_operator(&mut self, operators: &[TokenData<'static>]) -> Option<BinaryOp> {
        if !operators.iter().any(|op| op == self.peek()) {
            return None;
        }
        let operator = BinaryOp::from_token(self.peek());
        self.advance();
        operator
    }

    fn peek_token(&self) -> &Token<'a> {
        // `new` guarantees the stream ends with `Eof`, and `advance` never moves past it.
        &self.tokens[self.current]
    }

    fn peek(&self) -> &TokenData<'a> {
        &self.peek_token().data
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek_token().is_eof()
    }
}
