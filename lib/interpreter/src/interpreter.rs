use std::io::Write;

use parser::{BinaryOp, Expr, Stmt, UnaryOp};

mod value;
pub use value::Value;

mod environment;
pub use environment::{Environment, Scope};

mod lox;
pub use lox::{InterpretError, Lox};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
    #[error("Undefined variable \"{0}\".")]
    UndefinedVariable(String),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Tree-walking evaluator. Global bindings persist across calls, so one interpreter can
/// run several programs (or REPL lines) in sequence.
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `stmts` in order, writing `print` output to `out`. The first runtime error
    /// stops execution; output written before it stays written.
    pub fn interpret(&mut self, stmts: &[Stmt], out: &mut impl Write) -> Result<()> {
        for stmt in stmts {
            execute(stmt, &mut self.environment, &mut *out)?;
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        evaluate(expr, &mut self.environment)
    }

    #[cfg(test)]
    pub(crate) fn environment(&self) -> &Environment {
        &self.environment
    }
}

fn execute(stmt: &Stmt, environment: &mut Environment, out: &mut dyn Write) -> Result<()> {
    match stmt {
        Stmt::Print(expr) => {
            let value = evaluate(expr, environment)?;
            writeln!(out, "{}", value)?;
        }
        Stmt::Expression(expr) => {
            evaluate(expr, environment)?;
        }
        Stmt::Var { name, initializer } => {
            let value = match initializer {
                Some(init) => evaluate(init, environment)?,
                None => Value::Nil,
            };
            environment.define(name.lexeme(), value);
        }
        Stmt::Block(stmts) => {
            let mut scope = environment.scope();

            for stmt in stmts {
                execute(stmt, &mut scope, out)?;
            }
        }
    }
    Ok(())
}

fn evaluate(expr: &Expr, environment: &mut Environment) -> Result<Value> {
    match expr {
        Expr::Literal(literal) => Ok(literal.into()),

        Expr::Grouping(expr) => evaluate(expr, environment),

        Expr::Unary { operator, right } => {
            let right = evaluate(right, environment)?;
            match (operator, right) {
                (UnaryOp::Negate, Value::Number(n)) => Ok((-n).into()),
                (UnaryOp::Negate, _) => Err(RuntimeError::OperandMustBeNumber),
                (UnaryOp::Not, v) => Ok((!v.is_truthy()).into()),
            }
        }

        Expr::Variable(name) => environment.get(name.lexeme()).cloned(),

        Expr::Assign { name, value } => {
            let value = evaluate(value, environment)?;
            environment.assign(name.lexeme(), value.clone())?;
            Ok(value)
        }

        Expr::Binary { left, operator, right } => {
            let left = evaluate(left, environment)?;
            let right = evaluate(right, environment)?;
            binary(*operator, left, right)
        }
    }
}

fn binary(operator: BinaryOp, left: Value, right: Value) -> Result<Value> {
    use BinaryOp::*;
    match operator {
        Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok((l + r).into()),
            (Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),
            _ => Err(RuntimeError::OperandsMustBeNumbersOrStrings),
        },
        Subtract => numbers(&left, &right).map(|(l, r)| (l - r).into()),
        Multiply => numbers(&left, &right).map(|(l, r)| (l * r).into()),
        Divide => numbers(&left, &right).map(|(l, r)| (l / r).into()),

        Greater => numbers(&left, &right).map(|(l, r)| (l > r).into()),
        GreaterEqual => numbers(&left, &right).map(|(l, r)| (l >= r).into()),
        Less => numbers(&left, &right).map(|(l, r)| (l < r).into()),
        LessEqual => numbers(&left, &right).map(|(l, r)| (l <= r).into()),

        Equal => Ok((left == right).into()),
        NotEqual => Ok((left != right).into()),
    }
}

fn numbers(left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError::OperandsMustBeNumbers),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn evaluate_source(source: &str) -> Result<String> {
        let tokens = scanner::tokenize(source).into_result().unwrap();
        let expr = parser::parse_expression(tokens).unwrap();
        Interpreter::new().evaluate(&expr).map(|v| v.to_string())
    }

    fn run(source: &str) -> (String, Option<String>) {
        let tokens = scanner::tokenize(source).into_result().unwrap();
        let stmts = parser::parse_program(tokens).unwrap();
        let mut output = Vec::new();
        let result = Interpreter::new().interpret(&stmts, &mut output);
        (String::from_utf8(output).unwrap(), result.err().map(|e| e.to_string()))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(evaluate_source("1 + 2").unwrap(), "3");
        assert_eq!(evaluate_source("10 - 4 * 2").unwrap(), "2");
        assert_eq!(evaluate_source("(10 - 4) * 2").unwrap(), "12");
        assert_eq!(evaluate_source("7 / 2").unwrap(), "3.5");
        assert_eq!(evaluate_source("1 / 3").unwrap(), "0.33");
        assert_eq!(evaluate_source("-(3)").unwrap(), "-3");
        assert_eq!(evaluate_source("--3").unwrap(), "3");
        assert_eq!(evaluate_source("1 / 0").unwrap(), "Infinity");
        assert_eq!(evaluate_source("-1 / 0").unwrap(), "-Infinity");
        assert_eq!(evaluate_source("0 / 0").unwrap(), "NaN");
    }

    #[test]
    fn concatenation() {
        assert_eq!(evaluate_source("\"a\" + \"b\"").unwrap(), "ab");
        assert_eq!(evaluate_source("\"\" + \"\"").unwrap(), "");
        assert_eq!(evaluate_source("\"foo\" + \"bar\" + \"baz\"").unwrap(), "foobarbaz");
    }

    #[test]
    fn type_errors() {
        let error = |source: &str| evaluate_source(source).unwrap_err().to_string();

        assert_eq!(error("1 + \"a\""), "Operands must be two numbers or two strings.");
        assert_eq!(error("nil + nil"), "Operands must be two numbers or two strings.");
        assert_eq!(error("true + 1"), "Operands must be two numbers or two strings.");
        assert_eq!(error("\"a\" - \"b\""), "Operands must be numbers.");
        assert_eq!(error("2 * nil"), "Operands must be numbers.");
        assert_eq!(error("true / 2"), "Operands must be numbers.");
        assert_eq!(error("1 < \"2\""), "Operands must be numbers.");
        assert_eq!(error("nil >= nil"), "Operands must be numbers.");
        assert_eq!(error("-\"a\""), "Operand must be a number.");
        assert_eq!(error("-nil"), "Operand must be a number.");
    }

    #[test]
    fn comparison() {
        assert_eq!(evaluate_source("1 < 2").unwrap(), "true");
        assert_eq!(evaluate_source("2 <= 2").unwrap(), "true");
        assert_eq!(evaluate_source("1 > 2").unwrap(), "false");
        assert_eq!(evaluate_source("3 >= 4").unwrap(), "false");
    }

    #[test]
    fn equality() {
        assert_eq!(evaluate_source("nil == nil").unwrap(), "true");
        assert_eq!(evaluate_source("1 == \"1\"").unwrap(), "false");
        assert_eq!(evaluate_source("nil == false").unwrap(), "false");
        assert_eq!(evaluate_source("0 == false").unwrap(), "false");
        assert_eq!(evaluate_source("\"a\" == \"a\"").unwrap(), "true");
        assert_eq!(evaluate_source("\"a\" != \"b\"").unwrap(), "true");
        assert_eq!(evaluate_source("1 == 1.0").unwrap(), "true");
        assert_eq!(evaluate_source("true != true").unwrap(), "false");
    }

    #[test]
    fn truthiness() {
        assert_eq!(evaluate_source("!nil").unwrap(), "true");
        assert_eq!(evaluate_source("!false").unwrap(), "true");
        assert_eq!(evaluate_source("!0").unwrap(), "false");
        assert_eq!(evaluate_source("!\"\"").unwrap(), "false");
        assert_eq!(evaluate_source("!!true").unwrap(), "true");
    }

    #[test]
    fn literals() {
        assert_eq!(evaluate_source("nil").unwrap(), "nil");
        assert_eq!(evaluate_source("\"hello world\"").unwrap(), "hello world");
        assert_eq!(evaluate_source("42.50").unwrap(), "42.5");
        assert_eq!(evaluate_source("(((true)))").unwrap(), "true");
    }

    #[test]
    fn print() {
        assert_eq!(
            run("print 1; print \"two\"; print nil; print 1 == 1;"),
            ("1\ntwo\nnil\ntrue\n".to_string(), None)
        );
    }

    #[test]
    fn variables() {
        assert_eq!(run("var a = 1; var b; print a; print b;"), ("1\nnil\n".to_string(), None));
        assert_eq!(run("var a = 1; var a = a + 1; print a;"), ("2\n".to_string(), None));
        assert_eq!(run("var a; print a = 5; print a;"), ("5\n5\n".to_string(), None));
        assert_eq!(run("var a; var b; a = b = 3; print a + b;"), ("6\n".to_string(), None));
    }

    #[test]
    fn block_scoping() {
        assert_eq!(
            run("var x = 1; { var x = 2; print x; } print x;"),
            ("2\n1\n".to_string(), None)
        );
        assert_eq!(
            run("var x = 1; { x = 2; { var y = x + 1; print y; } } print x;"),
            ("3\n2\n".to_string(), None)
        );
    }

    #[test]
    fn block_locals_are_gone_after_the_block() {
        assert_eq!(
            run("{ var inner = 1; print inner; } print inner;"),
            ("1\n".to_string(), Some("Undefined variable \"inner\".".to_string()))
        );
    }

    #[test]
    fn undefined_assignment_halts() {
        assert_eq!(
            run("print 0; x = 5; print 1;"),
            ("0\n".to_string(), Some("Undefined variable \"x\".".to_string()))
        );
    }

    #[test]
    fn scope_is_restored_after_error_in_block() {
        let tokens = scanner::tokenize("var a = 1; { var a = 2; -nil; }").into_result().unwrap();
        let stmts = parser::parse_program(tokens).unwrap();
        let mut interpreter = Interpreter::new();
        let mut output = Vec::new();

        let error = interpreter.interpret(&stmts, &mut output).unwrap_err();
        assert_eq!(error.to_string(), "Operand must be a number.");
        assert_eq!(interpreter.environment().depth(), 1);
        assert_eq!(interpreter.environment().get("a").unwrap(), &Value::Number(1.0));
    }

    #[test]
    fn operands_evaluate_left_first() {
        assert_eq!(run("var a = 1; print (a = 2) + a;"), ("4\n".to_string(), None));
        // The left operand's error wins
        assert_eq!(
            run("print undefined_left + undefined_right;"),
            (String::new(), Some("Undefined variable \"undefined_left\".".to_string()))
        );
    }
}
