use std::io::Write;

use errors::CompileErrors;

use crate::{Interpreter, RuntimeError, Value};

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// Lexical or syntax errors. Nothing was executed.
    #[error("{0}")]
    CompileError(CompileErrors),
    #[error("{0}")]
    RuntimeError(#[from] RuntimeError),
}

impl From<CompileErrors> for InterpretError {
    fn from(errors: CompileErrors) -> Self {
        Self::CompileError(errors)
    }
}

/// Runs source text through scanner, parser and interpreter. Each phase only starts once
/// the previous one finished without errors.
#[derive(Debug, Default)]
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_source(&mut self, source: &str, out: &mut impl Write) -> Result<(), InterpretError> {
        let tokens = scanner::tokenize(source).into_result()?;
        let stmts = parser::parse_program(tokens).map_err(CompileErrors::from)?;
        self.interpreter.interpret(&stmts, out)?;
        Ok(())
    }

    /// Evaluates `source` as a single expression.
    pub fn evaluate_source(&mut self, source: &str) -> Result<Value, InterpretError> {
        let tokens = scanner::tokenize(source).into_result()?;
        let expr = parser::parse_expression(tokens).map_err(CompileErrors::from)?;
        Ok(self.interpreter.evaluate(&expr)?)
    }
}
