use scanner::Token;

use crate::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    Expression(Expr<'a>),
    Print(Expr<'a>),
    Var { name: Token<'a>, initializer: Option<Expr<'a>> },
    Block(Vec<Stmt<'a>>),
}
