use std::fmt::{self, Display, Formatter};

use cursor::Line;
use itertools::Itertools;

/// Where on its line a compile error was detected.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    /// Scanner errors don't point at a token.
    Unspecified,
    /// The offending token was `Eof`.
    End,
    /// The offending token's lexeme.
    Lexeme(String),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unspecified => Ok(()),
            Location::End => write!(f, " at end"),
            Location::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

/// A scanner or parser diagnostic, rendered as `[line L] Error<location>: <message>`.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct CompileError {
    pub line: Line,
    pub location: Location,
    pub message: String,
}

#[derive(thiserror::Error, Debug, Default, PartialEq, derive_more::Deref, derive_more::DerefMut)]
pub struct CompileErrors(pub Vec<CompileError>);

impl From<CompileError> for CompileErrors {
    fn from(e: CompileError) -> Self {
        Self(vec![e])
    }
}

impl FromIterator<CompileError> for CompileErrors {
    fn from_iter<T: IntoIterator<Item = CompileError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for CompileErrors {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
