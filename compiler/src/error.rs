//! Error taxonomy for the Jack compiler
//!
//! Every variant is fatal: compilation of the current file aborts on the
//! first error (and in directory mode, the whole run).

use std::fmt;

#[derive(Debug)]
pub enum CompilerError {
    Io(std::io::Error),
    Arg(String),
    Lex(String),
    Parse(String),
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Arg(msg) => write!(f, "argument error: {msg}"),
            Self::Lex(msg) => write!(f, "lex error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

pub type Result<T> = std::result::Result<T, CompilerError>;
