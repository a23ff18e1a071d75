use std::fmt::{self, Display, Formatter};

use scanner::{Token, TokenData};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: BinaryOp, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: UnaryOp, right: Box<Expr<'a>> },
    Literal(LiteralValue<'a>),
    Variable(Token<'a>),
    Assign { name: Token<'a>, value: Box<Expr<'a>> },
}

/// Fully parenthesized form, e.g. `(+ 1 (* 2 3))`.
impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator, right)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
            Expr::Variable(name) => {
                write!(f, "{}", name.lexeme())
            }
            Expr::Assign { name, value } => {
                write!(f, "(assign {} {})", name.lexeme(), value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum::Display)]
pub enum UnaryOp {
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "-")]
    Negate,
}

impl UnaryOp {
    pub fn from_token(data: &TokenData) -> Option<Self> {
        match data {
            TokenData::Bang => Some(UnaryOp::Not),
            TokenData::Minus => Some(UnaryOp::Negate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum::Display)]
pub enum BinaryOp {
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
}

impl BinaryOp {
    pub fn from_token(data: &TokenData) -> Option<Self> {
        use BinaryOp::*;
        Some(match data {
            TokenData::Star => Multiply,
            TokenData::Slash => Divide,
            TokenData::Plus => Add,
            TokenData::Minus => Subtract,
            TokenData::EqualEqual => Equal,
            TokenData::BangEqual => NotEqual,
            TokenData::Less => Less,
            TokenData::LessEqual => LessEqual,
            TokenData::Greater => Greater,
            TokenData::GreaterEqual => GreaterEqual,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl<'a> Display for LiteralValue<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
